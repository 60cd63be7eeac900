//! In-memory [`TimelineStore`] backed by a `BTreeMap`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tolkit_interchange::{load_path, TimelineDocument};

use crate::error::StoreError;
use crate::traits::TimelineStore;

/// A read-only store. All timelines are added through
/// [`MemoryStoreBuilder`] and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    timelines: BTreeMap<String, TimelineDocument>,
}

/// Collects timelines for a [`MemoryStore`], rejecting duplicate ids.
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    timelines: BTreeMap<String, TimelineDocument>,
}

impl MemoryStoreBuilder {
    pub fn insert(
        &mut self,
        timeline_id: impl Into<String>,
        document: TimelineDocument,
    ) -> Result<&mut Self, StoreError> {
        let timeline_id = timeline_id.into();
        if self.timelines.contains_key(&timeline_id) {
            return Err(StoreError::DuplicateTimeline { timeline_id });
        }
        tracing::debug!(timeline = %timeline_id, entries = document.len(), "timeline added");
        self.timelines.insert(timeline_id, document);
        Ok(self)
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore {
            timelines: self.timelines,
        }
    }
}

impl MemoryStore {
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    pub fn from_documents<I, S>(documents: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (S, TimelineDocument)>,
        S: Into<String>,
    {
        let mut builder = Self::builder();
        for (id, document) in documents {
            builder.insert(id, document)?;
        }
        Ok(builder.build())
    }

    /// Load every `*.json` and `*.js` file directly inside `dir`.
    ///
    /// Each timeline is stored under its loaded name (the fixture binding,
    /// else the file stem). Files are read in name order, so a duplicate
    /// name always reports the later file.
    pub fn load_dir(dir: &Path) -> Result<Self, StoreError> {
        let io_error = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_timeline_file(p))
            .collect();
        paths.sort();

        let mut builder = Self::builder();
        for path in paths {
            let loaded = load_path(&path).map_err(|e| StoreError::Load {
                path: path.clone(),
                message: e.to_string(),
            })?;
            builder.insert(loaded.name, loaded.document)?;
        }

        let store = builder.build();
        tracing::info!(dir = %dir.display(), timelines = store.len(), "store loaded");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

fn is_timeline_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("js")
    )
}

impl TimelineStore for MemoryStore {
    fn timeline_ids(&self) -> Vec<String> {
        self.timelines.keys().cloned().collect()
    }

    fn timeline(&self, timeline_id: &str) -> Result<&TimelineDocument, StoreError> {
        self.timelines
            .get(timeline_id)
            .ok_or_else(|| StoreError::TimelineNotFound {
                timeline_id: timeline_id.to_string(),
            })
    }
}
