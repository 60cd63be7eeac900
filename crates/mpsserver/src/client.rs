//! Blocking mpsserver client.

use std::time::Duration;

use tolkit_interchange::hierarchy::descendants;
use tolkit_interchange::{from_timeline, ActivityRecord, TimelineDocument};

use crate::config::MpsServerConfig;
use crate::endpoint::{record_url, Expansion};
use crate::error::MpsServerError;

/// Fetches child and descendant activities from mpsserver.
///
/// - requests time out after `timeout_secs`
/// - `Authorization: Bearer <token>` is sent when a token is configured
///   (see [`MpsServerConfig::resolve_token`])
pub struct MpsServerClient {
    agent: ureq::Agent,
    config: MpsServerConfig,
    auth_token: Option<String>,
}

impl MpsServerClient {
    pub fn new(config: MpsServerConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();
        let auth_token = config.resolve_token();

        MpsServerClient {
            agent: ureq::Agent::new_with_config(agent_config),
            config,
            auth_token,
        }
    }

    pub fn config(&self) -> &MpsServerConfig {
        &self.config
    }

    /// GET `url` and decode the body as an activity timeline.
    pub fn fetch_document(&self, url: &str) -> Result<TimelineDocument, MpsServerError> {
        tracing::debug!(url, "fetching activity timeline");

        let mut request = self.agent.get(url);
        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => MpsServerError::Status {
                url: url.to_string(),
                status,
            },
            other => MpsServerError::Request {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        let value: serde_json::Value =
            response
                .into_body()
                .read_json()
                .map_err(|e| MpsServerError::Request {
                    url: url.to_string(),
                    message: format!("failed to parse response as JSON: {}", e),
                })?;

        from_timeline(&value).map_err(|source| MpsServerError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Related activities of `record`, flattened depth-first.
    ///
    /// The response's first entry is `record` itself; only what is nested
    /// under it is returned.
    pub fn expand(
        &self,
        record: &ActivityRecord,
        expansion: Expansion,
    ) -> Result<Vec<ActivityRecord>, MpsServerError> {
        let url = record_url(&self.config, record, expansion)?;
        let document = self.fetch_document(&url)?;
        let related = descendants(&document);
        tracing::debug!(
            activity = %record.activity_id,
            ?expansion,
            count = related.len(),
            "expanded activity"
        );
        Ok(related)
    }

    pub fn children(
        &self,
        record: &ActivityRecord,
    ) -> Result<Vec<ActivityRecord>, MpsServerError> {
        self.expand(record, Expansion::Children)
    }

    pub fn descendants(
        &self,
        record: &ActivityRecord,
    ) -> Result<Vec<ActivityRecord>, MpsServerError> {
        self.expand(record, Expansion::Descendants)
    }
}
