//! Unwrapping of JavaScript demo fixtures.
//!
//! Demo timelines ship as a script assigning the document to a global,
//! e.g. `window.telecom = { ... };`. Plain JSON is accepted unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// A fixture with its JS wrapper removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Name of the assigned binding (`telecom` for `window.telecom = ...`).
    pub binding: Option<String>,
    pub value: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("fixture is empty")]
    Empty,
    #[error("invalid JSON in fixture: {0}")]
    Json(#[from] serde_json::Error),
}

fn assignment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:window\.|(?:var|let|const)\s+)([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*")
            .expect("assignment pattern is a valid regex")
    })
}

/// Strip an optional `window.<name> = ... ;` wrapper and parse the JSON.
pub fn unwrap_fixture(text: &str) -> Result<Fixture, FixtureError> {
    if text.trim().is_empty() {
        return Err(FixtureError::Empty);
    }

    let (binding, body) = match assignment_pattern().captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (Some(caps[1].to_string()), &text[whole..])
        }
        None => (None, text),
    };

    let body = body.trim_end();
    let body = body.strip_suffix(';').unwrap_or(body);

    let value = serde_json::from_str(body)?;
    Ok(Fixture { binding, value })
}
