use serde::Deserialize;

/// Response format flag sent with every request.
pub const DEFAULT_FORMAT: &str = "TMS";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Overrides `auth_token` from the config file when set.
pub const TOKEN_ENV_VAR: &str = "TOL_MPSSERVER_TOKEN";

/// Connection settings, read from the `[mpsserver]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MpsServerConfig {
    /// e.g. `https://mpsserver.example.org/mpsserver/api/v2`
    pub base_url: Option<String>,
    /// Path namespace, e.g. `leucadia`.
    pub namespace: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub auth_token: Option<String>,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for MpsServerConfig {
    fn default() -> Self {
        MpsServerConfig {
            base_url: None,
            namespace: None,
            format: default_format(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
        }
    }
}

impl MpsServerConfig {
    /// The bearer token: `TOL_MPSSERVER_TOKEN` if set, else `auth_token`.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.auth_token.clone())
    }
}
