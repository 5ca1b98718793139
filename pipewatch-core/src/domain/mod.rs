//! Core domain types
//!
//! Raw pipeline entities as reported by the CI/CD provider. These types are
//! read-only inputs to the view builders and only live for one poll cycle.

pub mod epoch;
pub mod pipeline;
pub mod status;
