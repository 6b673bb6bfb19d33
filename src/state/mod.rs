//! State module for tracking the lifecycle of a crawl run
//!
//! # Components
//!
//! - `FrontierState`: the phase a frontier is in (idle, running, draining, terminated)
//! - `SharedFrontierState`: an atomic cell holding that phase so workers and the
//!   caller of `start` can observe and advance it without locking

mod frontier_state;

// Re-export main types
pub use frontier_state::{FrontierState, SharedFrontierState};
