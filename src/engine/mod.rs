//! Matching Engine Module
//!
//! This module contains the double-auction core:
//! - `errors` - Error types for submissions and matching runs
//! - `validation` - Submission checks applied before anything is persisted
//! - `matching` - Pure FIFO crossing over a snapshot of pending orders
//! - `matching_engine` - Locked, transactional matching runs over a store

pub mod errors;
pub mod matching;
pub mod matching_engine;
pub mod validation;

// Re-export commonly used types for convenience
pub use errors::EngineError;
pub use matching::{crosses, plan_matches, MatchPlan, QuantityDelta};
pub use matching_engine::{BookState, MatchReport, MatchingEngine, MatchingService};
pub use validation::validate_new_order;
