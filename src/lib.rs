//! # Dodgeball Index
//!
//! Performance indices and power rankings for dodgeball players.
//!
//! ## Architecture
//!
//! - **models**: Raw counters, derived metrics, player records, standings
//! - **calculate**: Percentages and attack/defense/power indices
//! - **rank**: Ordering and dense ranking within one scope
//! - **config**: Configuration loading and validation
//! - **storage**: JSONL input and output files
//!
//! Data flows one way: raw counters are scored by a [`MetricComputer`],
//! scored entries are ranked. Derived metrics are never stored or accepted
//! as input; they are recomputed from counters on every read.

pub mod calculate;
pub mod config;
pub mod models;
pub mod rank;
pub mod storage;

pub use calculate::{IndexWeights, MetricComputer};
pub use models::*;
