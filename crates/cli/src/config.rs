//! Configuration file for `tol`.
//!
//! Every table is optional; missing keys take their defaults.
//!
//! # Example
//!
//! ```toml
//! [mpsserver]
//! base_url = "https://mpsserver.example.org/mpsserver/api/v2"
//! namespace = "leucadia"
//! format = "TMS"
//! timeout_secs = 30
//! auth_token = "..."
//!
//! [analysis]
//! span_tolerance_ms = 1000
//! ```

use std::path::Path;

use serde::Deserialize;
use tolkit_analyze::{AnalysisOptions, DEFAULT_SPAN_TOLERANCE_MS};
use tolkit_mpsserver::MpsServerConfig;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Top-level configuration, loaded from `--config <path>` or `TOL_CONFIG`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ToolConfig {
    #[serde(default)]
    pub mpsserver: MpsServerConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// `[analysis]` table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnalysisSettings {
    /// Allowed drift between a textual duration and `end - start`.
    #[serde(default = "default_span_tolerance_ms")]
    pub span_tolerance_ms: i64,
}

fn default_span_tolerance_ms() -> i64 {
    DEFAULT_SPAN_TOLERANCE_MS
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            span_tolerance_ms: DEFAULT_SPAN_TOLERANCE_MS,
        }
    }
}

impl AnalysisSettings {
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions::with_tolerance_ms(self.span_tolerance_ms)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Read and parse a config file.
pub(crate) fn read_config(path: &Path) -> Result<ToolConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read config '{}': {}", path.display(), e))?;

    parse_config(&content)
        .map_err(|e| format!("could not parse config '{}': {}", path.display(), e))
}

fn parse_config(content: &str) -> Result<ToolConfig, toml::de::Error> {
    let config: ToolConfig = toml::from_str(content)?;
    if config.analysis.span_tolerance_ms < 0 {
        return Err(serde::de::Error::custom(
            "analysis.span_tolerance_ms must not be negative",
        ));
    }
    Ok(config)
}

/// The config at `path`, or defaults when no path was given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ToolConfig, String> {
    match path {
        Some(path) => {
            let config = read_config(path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(ToolConfig::default()),
    }
}
