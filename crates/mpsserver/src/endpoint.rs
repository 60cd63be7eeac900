//! URL construction for child/descendant lookups.

use tolkit_interchange::ActivityRecord;
use url::Url;

use crate::config::MpsServerConfig;
use crate::error::MpsServerError;

/// Which related activities to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Direct children only.
    Children,
    /// The whole subtree.
    Descendants,
}

impl Expansion {
    /// The mpsserver collection serving this expansion.
    pub fn path_segment(self) -> &'static str {
        match self {
            Expansion::Children => "tol_child_activities-mongodb",
            Expansion::Descendants => "tol_descendant_activities-mongodb",
        }
    }
}

/// Build `{base}/{segment}/{namespace}/{fileId}?parentId={activityId}&format={format}`.
///
/// Every path component is percent-encoded; a namespace written as a path
/// (`/leucadia/telecom/`) contributes one segment per component.
pub fn activity_url(
    config: &MpsServerConfig,
    expansion: Expansion,
    file_id: &str,
    activity_id: &str,
) -> Result<String, MpsServerError> {
    let base = config
        .base_url
        .as_deref()
        .ok_or(MpsServerError::MissingConfig { field: "base_url" })?;
    let namespace = config
        .namespace
        .as_deref()
        .ok_or(MpsServerError::MissingConfig { field: "namespace" })?;

    let invalid = |message: String| MpsServerError::InvalidUrl {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .push(expansion.path_segment())
        .extend(namespace.split('/').filter(|s| !s.is_empty()))
        .push(file_id);
    url.query_pairs_mut()
        .clear()
        .append_pair("parentId", activity_id)
        .append_pair("format", &config.format);

    Ok(url.into())
}

/// The URL to fetch for `record`: its own `childrenUrl`/`descendantsUrl`
/// when it carries one, else one built from the config.
pub fn record_url(
    config: &MpsServerConfig,
    record: &ActivityRecord,
    expansion: Expansion,
) -> Result<String, MpsServerError> {
    let own = match expansion {
        Expansion::Children => record.children_url.as_deref(),
        Expansion::Descendants => record.descendants_url.as_deref(),
    };
    match own {
        Some(url) => {
            Url::parse(url).map_err(|e| MpsServerError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            Ok(url.to_string())
        }
        None => activity_url(config, expansion, &record.file_id, &record.activity_id),
    }
}
