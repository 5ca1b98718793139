//! Service layer
//!
//! Services contain the poller's business logic: fetching and summarising a
//! single pipeline, and reporting group statuses from the cache.

mod collector;
mod reporter;

pub use collector::{Account, PipelineCollector};
pub use reporter::StatusReporter;
