//! Validates every sample fixture against the document schema at
//! schema/timeline-schema.json, and checks the schema rejects the
//! malformed-pair fixture the loader also rejects.

use std::path::{Path, PathBuf};

use tolkit_interchange::unwrap_fixture;

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn schema_validator() -> jsonschema::Validator {
    let schema_path = workspace_root().join("schema/timeline-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

fn read_fixture(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    unwrap_fixture(&text).unwrap().value
}

fn collect_fixtures(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "json" || e == "js"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn validate_sample_fixtures_against_schema() {
    let validator = schema_validator();
    let mut failures = Vec::new();
    let mut tested = 0usize;

    for path in collect_fixtures(&workspace_root().join("fixtures")) {
        let instance = read_fixture(&path);
        for error in validator.iter_errors(&instance) {
            failures.push(format!("{}: {}", path.display(), error));
        }
        tested += 1;
    }

    assert!(tested > 0, "No fixtures found -- check paths");
    assert!(
        failures.is_empty(),
        "Schema validation failed:\n{}",
        failures.join("\n")
    );
}

#[test]
fn schema_rejects_extra_pair_key() {
    let validator = schema_validator();
    let instance = read_fixture(&workspace_root().join("fixtures/invalid/extra_pair_key.json"));
    assert!(!validator.is_valid(&instance));
}

#[test]
fn schema_rejects_non_activity_timeline() {
    let validator = schema_validator();
    let mut instance = read_fixture(&workspace_root().join("fixtures/telecom.js"));
    instance["Timeline Metadata"]["hasTimelineType"] = serde_json::json!("state");
    assert!(!validator.is_valid(&instance));
}

#[test]
fn schema_requires_millisecond_fraction() {
    let validator = schema_validator();
    let mut instance = read_fixture(&workspace_root().join("fixtures/telecom.js"));
    assert!(validator.is_valid(&instance));

    instance["Timeline Data"][0]["Tstart Assigned"] = serde_json::json!("2022-167T02:15:54.5841");
    assert!(!validator.is_valid(&instance));

    instance["Timeline Data"][0]["Tstart Assigned"] = serde_json::json!("2022-167T02:15:54.5");
    assert!(!validator.is_valid(&instance));

    instance["Timeline Data"][0]["Tstart Assigned"] = serde_json::json!("2022-167T02:15:54");
    assert!(validator.is_valid(&instance));
}
