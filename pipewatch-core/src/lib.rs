//! Pipewatch Core
//!
//! Core types and status-derivation logic for the pipeline status monitor.
//!
//! This crate contains:
//! - Domain types: raw pipeline state as reported by the CI/CD provider
//! - DTOs: provider request/response envelopes
//! - Views: immutable, render-ready summaries derived from the raw state
//! - Cache: the shared pipeline name -> latest summary store

pub mod cache;
pub mod domain;
pub mod dto;
pub mod view;

pub use cache::StatusCache;
pub use domain::status::ExecutionStatus;
pub use view::{ArtifactRevisionView, PipelineGroup, PipelineSummaryView, StageView};
