mod config;
mod envelope;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tolkit_analyze::{analyze, group_by_legend, AnalysisReport, FindingSeverity};
use tolkit_interchange::{
    dhms, format_duration, from_timeline, load_path, unwrap_fixture, ActivityRecord,
    LoadedTimeline,
};
use tolkit_mpsserver::{record_url, Expansion, MpsServerClient, MpsServerConfig};
use tolkit_store::{MemoryStore, StoreError, TimelineStore};

use crate::config::{load_config, ToolConfig};

static TIMELINE_SCHEMA_STR: &str = include_str!("../../../schema/timeline-schema.json");

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Activity timeline (TOL) toolkit.
#[derive(Parser)]
#[command(name = "tol", version, about = "Activity timeline (TOL) toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter used when RUST_LOG is unset (e.g. debug, tolkit_mpsserver=debug)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Path to a TOML config file
    #[arg(long, global = true, env = "TOL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a timeline against the JSON Schema, the loader and the consistency checks
    Validate {
        /// Path to the timeline (.json, or .js fixture)
        file: PathBuf,
    },

    /// Summarize a timeline: header, counts, time range, types and bands
    Inspect {
        /// Path to the timeline (.json, or .js fixture)
        file: PathBuf,
    },

    /// Group activities into legend bands with their colours
    Legends {
        /// Path to the timeline (.json, or .js fixture)
        file: PathBuf,
        /// Hide activities whose name does not match this regex
        #[arg(long)]
        filter: Option<String>,
    },

    /// Export a timeline as a canonical JSON envelope with an etag
    Export {
        /// Path to the timeline (.json, or .js fixture)
        file: PathBuf,
    },

    /// Fetch the children or descendants of an activity from mpsserver
    Expand {
        /// Path to the timeline (.json, or .js fixture)
        file: PathBuf,
        /// Activity ID to expand
        #[arg(long)]
        activity: String,
        /// Fetch the whole subtree instead of direct children
        #[arg(long)]
        descendants: bool,
        /// Print the request URL without fetching it
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Validate { file } => {
            cmd_validate(&file, &config, cli.output, cli.quiet);
        }
        Commands::Inspect { file } => {
            cmd_inspect(&file, &config, cli.output, cli.quiet);
        }
        Commands::Legends { file, filter } => {
            cmd_legends(&file, filter.as_deref(), cli.output, cli.quiet);
        }
        Commands::Export { file } => {
            cmd_export(&file, cli.output, cli.quiet);
        }
        Commands::Expand {
            file,
            activity,
            descendants,
            dry_run,
        } => {
            let expansion = if descendants {
                Expansion::Descendants
            } else {
                Expansion::Children
            };
            cmd_expand(&file, &activity, expansion, dry_run, &config, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `--log-level`.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── validate ──────────────────────────────────────────────────────────────────

fn cmd_validate(file: &Path, config: &ToolConfig, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(TIMELINE_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded timeline schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let text = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let fixture = match unwrap_fixture(&text) {
        Ok(f) => f,
        Err(e) => {
            let msg = format!("error parsing '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let schema_errors: Vec<String> = validator
        .iter_errors(&fixture.value)
        .map(|e| format!("{}", e))
        .collect();
    if !schema_errors.is_empty() {
        report_invalid("schema", &schema_errors, output, quiet);
        process::exit(1);
    }

    let document = match from_timeline(&fixture.value) {
        Ok(d) => d,
        Err(e) => {
            report_invalid("loader", &[e.to_string()], output, quiet);
            process::exit(1);
        }
    };

    let report = analyze(&document, &config.analysis.options());
    if report.has_errors() {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid timeline");
                    print_findings(&report, true);
                }
            }
            OutputFormat::Json => {
                if !quiet {
                    let json = serde_json::json!({
                        "valid": false,
                        "stage": "analysis",
                        "findings": report.findings,
                    });
                    eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
                }
            }
        }
        process::exit(1);
    }

    if !quiet {
        match output {
            OutputFormat::Text => {
                println!("valid");
                print_findings(&report, false);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": true,
                    "entries": document.len(),
                    "findings": report.findings,
                });
                println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
            }
        }
    }
}

fn report_invalid(stage: &str, errors: &[String], output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            eprintln!("invalid timeline ({})", stage);
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "stage": stage,
                "errors": errors,
            });
            eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
    }
}

/// Findings in text form. Errors go to stderr alongside "invalid".
fn print_findings(report: &AnalysisReport, to_stderr: bool) {
    for finding in &report.findings {
        let severity = match finding.severity {
            FindingSeverity::Error => "ERROR",
            FindingSeverity::Warning => "WARNING",
            FindingSeverity::Info => "INFO",
        };
        let context = finding
            .activity_id
            .as_ref()
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();
        let line = format!("  [{}/{}]{}: {}", finding.check, severity, context, finding.message);
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ── inspect ───────────────────────────────────────────────────────────────────

fn cmd_inspect(file: &Path, config: &ToolConfig, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(file, output, quiet);
    let report = analyze(&loaded.document, &config.analysis.options());
    let canonical = match envelope::canonical_document(&loaded.document) {
        Ok(v) => v,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let etag = envelope::compute_etag(&canonical);

    if quiet {
        return;
    }

    let metadata = &loaded.document.metadata;
    let stats = &report.stats;
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "name": loaded.name,
                "metadata": metadata,
                "stats": stats,
                "etag": etag,
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("Timeline: {}", loaded.name);
            if let Some(ref name) = metadata.object_name {
                let object_type = metadata.object_type.as_deref().unwrap_or("unknown");
                println!("  Object: {} ({})", name, object_type);
            }
            if let Some(ref namespace) = metadata.namespace {
                println!("  Namespace: {}", namespace);
            }
            if let Some(ref time_system) = metadata.time_system {
                println!("  Time system: {}", time_system);
            }
            if metadata.decimated {
                println!("  Decimated: yes");
            }

            let skipped = if stats.skipped_records > 0 {
                format!(", {} of other kinds", stats.skipped_records)
            } else {
                String::new()
            };
            println!(
                "  Entries: {} ({} records including children{})",
                stats.entry_count, stats.record_count, skipped
            );
            match stats.time_range {
                Some(range) => println!(
                    "  Time range: {} .. {} ({})",
                    range.start,
                    range.end,
                    format_duration(range.duration(), true)
                ),
                None => println!("  Time range: none"),
            }
            println!("  Total duration: {}", dhms(stats.total_duration()));
            println!("  Activity types: {}", counts(&stats.activity_types));
            if !stats.bands.is_empty() {
                println!("  Bands: {}", counts(&stats.bands));
            }
            println!("  Etag: {}", etag);
        }
    }
}

fn counts(map: &std::collections::BTreeMap<String, usize>) -> String {
    if map.is_empty() {
        return "none".to_string();
    }
    map.iter()
        .map(|(k, v)| format!("{} ({})", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── legends ───────────────────────────────────────────────────────────────────

fn cmd_legends(file: &Path, filter: Option<&str>, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(file, output, quiet);
    let mut groups = group_by_legend(&loaded.name, &loaded.document.entries);

    if let Some(pattern) = filter {
        if let Err(e) = groups.filter(pattern) {
            let msg = format!("invalid filter '{}': {}", pattern, e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&groups).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("Legends: {}", groups.legends.len());
            if let Some(range) = groups.max_time_range {
                println!("  Range: {} .. {}", range.start, range.end);
            }
            for band in &groups.legends {
                let color = band
                    .points
                    .first()
                    .map(|p| p.color.to_hex())
                    .unwrap_or_default();
                println!(
                    "  {} {} ({} visible, {} hidden)",
                    color,
                    band.name,
                    band.visible(),
                    band.hidden()
                );
            }
        }
    }
}

// ── export ────────────────────────────────────────────────────────────────────

fn cmd_export(file: &Path, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(file, output, quiet);
    let document = match envelope::canonical_document(&loaded.document) {
        Ok(v) => v,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let envelope = envelope::build_envelope(document);

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            let msg = format!("serialization error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

// ── expand ────────────────────────────────────────────────────────────────────

fn cmd_expand(
    file: &Path,
    activity_id: &str,
    expansion: Expansion,
    dry_run: bool,
    config: &ToolConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let LoadedTimeline { name, document } = load_or_exit(file, output, quiet);
    let document_namespace = document.metadata.namespace.clone();

    let store = match MemoryStore::from_documents([(name.clone(), document)]) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    let record = match store.activity(&name, activity_id) {
        Ok(r) => r,
        Err(StoreError::ActivityNotFound { .. }) => {
            let msg = format!("activity '{}' not found in '{}'", activity_id, name);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let mps_config = MpsServerConfig {
        namespace: config.mpsserver.namespace.clone().or(document_namespace),
        ..config.mpsserver.clone()
    };

    let url = match record_url(&mps_config, record, expansion) {
        Ok(u) => u,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if dry_run {
        if !quiet {
            match output {
                OutputFormat::Text => println!("{}", url),
                OutputFormat::Json => {
                    let json = serde_json::json!({ "url": url });
                    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
                }
            }
        }
        return;
    }

    let client = MpsServerClient::new(mps_config);
    let related = match client.expand(record, expansion) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&related).unwrap_or_default());
        }
        OutputFormat::Text => {
            let what = match expansion {
                Expansion::Children => "children",
                Expansion::Descendants => "descendants",
            };
            println!("{} {} of {}:", related.len(), what, record.activity_id);
            for r in &related {
                print_activity(r);
            }
        }
    }
}

fn print_activity(record: &ActivityRecord) {
    let depth = record.ancestors.len();
    println!(
        "  {:indent$}{} [{}] {} .. {}",
        "",
        record.activity_id,
        record.activity_type,
        record.start,
        record.end,
        indent = depth * 2
    );
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn load_or_exit(file: &Path, output: OutputFormat, quiet: bool) -> LoadedTimeline {
    match load_path(file) {
        Ok(loaded) => {
            tracing::debug!(
                name = %loaded.name,
                entries = loaded.document.len(),
                "loaded timeline"
            );
            loaded
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
