//! Scheduler layer for the poller
//!
//! This layer drives the repeating poll cycle across every configured
//! account and publishes the rebuilt summaries into the status cache.

pub mod poller;
pub mod timer;

pub use poller::StatusPoller;
pub use timer::RepeatingTask;
