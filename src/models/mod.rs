//! Core data models for the index engine.

mod counters;
mod ids;
mod metrics;
mod player;
mod standings;

pub use counters::*;
pub use ids::*;
pub use metrics::*;
pub use player::*;
pub use standings::*;
