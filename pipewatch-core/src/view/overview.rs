//! Cross-group overview
//!
//! Helpers for the landing page: what is running, what is failing, and the
//! URL paths of groups and pipelines.

use std::sync::Arc;

use super::group::PipelineGroup;
use super::summary::PipelineSummaryView;

/// Read-only view over a list of groups
#[derive(Debug, Clone, Copy)]
pub struct Overview<'a> {
    groups: &'a [PipelineGroup],
}

impl<'a> Overview<'a> {
    pub fn new(groups: &'a [PipelineGroup]) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &'a [PipelineGroup] {
        self.groups
    }

    fn members(self) -> impl Iterator<Item = &'a Arc<PipelineSummaryView>> + 'a {
        self.groups.iter().flat_map(|group| group.pipelines().iter())
    }

    /// Members currently executing, in group order
    pub fn running_pipelines(&self) -> Vec<&'a Arc<PipelineSummaryView>> {
        self.members().filter(|pipeline| pipeline.is_running()).collect()
    }

    /// Members whose latest execution failed, in group order
    pub fn failing_pipelines(&self) -> Vec<&'a Arc<PipelineSummaryView>> {
        self.members()
            .filter(|pipeline| pipeline.status.is_failed())
            .collect()
    }

    pub fn find_group_by_slug(&self, slug: &str) -> Option<&'a PipelineGroup> {
        self.groups.iter().find(|group| slugify(group.name()) == slug)
    }

    /// Path of the first group listing the pipeline
    pub fn pipeline_path(&self, pipeline_name: &str) -> Option<String> {
        let group = self.groups.iter().find(|group| {
            group
                .pipelines()
                .iter()
                .any(|pipeline| pipeline.name == pipeline_name)
        })?;

        Some(format!(
            "{}/pipeline/{}",
            group_path(group.name()),
            slugify(pipeline_name)
        ))
    }
}

pub fn group_path(group_name: &str) -> String {
    format!("/group/{}", slugify(group_name))
}

/// Lower-cases and replaces spaces, `_`, `:` and `/` with `-`
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '_' | ':' | '/' => '-',
            other => other,
        })
        .collect()
}
