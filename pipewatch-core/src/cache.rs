//! Status cache
//!
//! Concurrent pipeline name -> latest summary store. The poller is the only
//! writer; any number of readers may query it at the same time. Entries are
//! replaced wholesale, so a reader always sees either the previous or the new
//! summary for a pipeline, never a mix.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::view::{PipelineGroup, PipelineSummaryView};

/// Shared store of the latest summary per pipeline
///
/// Construct once and hand out through an `Arc` to the poller and readers.
#[derive(Debug, Default)]
pub struct StatusCache {
    entries: DashMap<String, Arc<PipelineSummaryView>>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a summary, replacing any previous one for the same pipeline
    pub fn put(&self, view: PipelineSummaryView) {
        self.entries.insert(view.name.clone(), Arc::new(view));
    }

    /// Latest published summary for a pipeline
    pub fn get(&self, name: &str) -> Option<Arc<PipelineSummaryView>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Point-in-time copy of every entry, ordered by pipeline name
    pub fn all(&self) -> BTreeMap<String, Arc<PipelineSummaryView>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a group from the cached summaries of the named pipelines
    ///
    /// Input order is preserved; pipelines without a cached summary are
    /// left out.
    pub fn group<S: AsRef<str>>(&self, name: &str, pipeline_names: &[S]) -> PipelineGroup {
        let pipelines = pipeline_names
            .iter()
            .filter_map(|pipeline| self.get(pipeline.as_ref()))
            .collect();
        PipelineGroup::new(name, pipelines)
    }
}
