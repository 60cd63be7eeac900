use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tolkit_interchange::TimelineDocument;

/// Export envelope version.
const ENVELOPE_TOL_VERSION: &str = "1.0";

/// SHA-256 etag over the compact JSON form.
///
/// `serde_json::Map` keeps keys sorted, so equal documents always
/// serialize to the same bytes.
pub(crate) fn compute_etag(document: &Value) -> String {
    let canonical = document.to_string();
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

/// Canonical JSON form of a loaded timeline.
pub(crate) fn canonical_document(document: &TimelineDocument) -> Result<Value, String> {
    serde_json::to_value(document).map_err(|e| format!("serialization error: {}", e))
}

/// Wrap a timeline as `{document, etag, tol}`.
pub(crate) fn build_envelope(document: Value) -> Value {
    let etag = compute_etag(&document);
    let mut map = Map::new();
    map.insert("document".to_string(), document);
    map.insert("etag".to_string(), Value::String(etag));
    map.insert(
        "tol".to_string(),
        Value::String(ENVELOPE_TOL_VERSION.to_string()),
    );
    Value::Object(map)
}
