//! View types
//!
//! Immutable, render-ready summaries derived from the raw provider state.
//! Views are rebuilt from scratch every poll cycle and replace the previous
//! value wholesale; nothing mutates them after construction.

pub mod group;
pub mod overview;
pub mod revision;
pub mod stage;
pub mod summary;

pub use group::PipelineGroup;
pub use overview::Overview;
pub use revision::ArtifactRevisionView;
pub use stage::StageView;
pub use summary::PipelineSummaryView;
