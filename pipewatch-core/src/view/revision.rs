//! Artifact revision view

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::ArtifactRevision;

pub const NO_SUMMARY: &str = "No summary available";
pub const UNKNOWN_PROVIDER: &str = "Error: Unknown provider type";

/// Human-readable description of the source revision an execution used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRevisionView {
    pub name: String,
    pub revision_id: String,
    /// Always plain text, never the raw JSON blob
    pub summary: String,
}

/// JSON shape of summaries written by git source actions
#[derive(Deserialize)]
struct SourceRevisionSummary {
    #[serde(rename = "ProviderType", default)]
    provider_type: Option<String>,
    #[serde(rename = "CommitMessage", default)]
    commit_message: Option<String>,
}

impl ArtifactRevisionView {
    pub fn build(artifact: &ArtifactRevision) -> Self {
        Self {
            name: artifact.name.clone(),
            revision_id: artifact.revision_id.clone(),
            summary: resolve_summary(artifact.revision_summary.as_deref()),
        }
    }

    /// First line of the summary, e.g. a commit headline
    pub fn headline(&self) -> &str {
        self.summary.lines().next().unwrap_or_default()
    }
}

fn resolve_summary(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NO_SUMMARY.to_string();
    };

    if !raw.starts_with('{') {
        return raw.to_string();
    }

    // Unparseable JSON is reported the same way as an unknown provider.
    let Ok(parsed) = serde_json::from_str::<SourceRevisionSummary>(raw) else {
        return UNKNOWN_PROVIDER.to_string();
    };

    match parsed.provider_type.as_deref() {
        Some("GitHub" | "CodeCommit") => parsed
            .commit_message
            .unwrap_or_else(|| NO_SUMMARY.to_string()),
        _ => UNKNOWN_PROVIDER.to_string(),
    }
}
