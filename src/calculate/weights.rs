//! Coefficient table for the attack, defense and power indices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight table errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("Weight `{0}` must be a finite number")]
    NonFinite(&'static str),
}

/// How an index is normalized by sets played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadScaling {
    /// Divide by the square root of sets played
    #[default]
    Sqrt,
    /// Divide by sets played
    Linear,
    /// No normalization
    #[serde(rename = "none")]
    Unscaled,
}

impl WorkloadScaling {
    /// Divisor applied to an index for the given (non-zero) sets played.
    pub fn divisor(&self, sets_jugados: u32) -> f64 {
        match self {
            WorkloadScaling::Sqrt => (sets_jugados as f64).sqrt(),
            WorkloadScaling::Linear => sets_jugados as f64,
            WorkloadScaling::Unscaled => 1.0,
        }
    }
}

/// Coefficients of every index formula.
///
/// The defaults are the league scoring scheme: offense-favoring composite
/// (0.6 attack / 0.4 defense), catches weighted far above blocks and dodges,
/// and square-root workload normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexWeights {
    // Attack
    pub hit_weight: f64,
    pub out_weight: f64,
    pub assist_weight: f64,
    /// Penalty per time the player was caught out
    pub caught_out_weight: f64,
    /// Weight of production-per-shot in the attack index
    pub efficiency_weight: f64,

    // Defense
    pub block_weight: f64,
    pub catch_weight: f64,
    pub dodge_weight: f64,
    pub effortless_dodge_weight: f64,
    /// Multiplier on sqrt(shots faced)
    pub exposure_weight: f64,

    // Composite
    pub attack_weight: f64,
    pub defense_weight: f64,

    pub workload_scaling: WorkloadScaling,
}

impl Default for IndexWeights {
    fn default() -> Self {
        Self {
            hit_weight: 0.5,
            out_weight: 1.0,
            assist_weight: 0.75,
            caught_out_weight: 0.5,
            efficiency_weight: 0.5,
            block_weight: 0.75,
            catch_weight: 5.5,
            dodge_weight: 0.75,
            effortless_dodge_weight: 0.1,
            exposure_weight: 0.2,
            attack_weight: 0.6,
            defense_weight: 0.4,
            workload_scaling: WorkloadScaling::Sqrt,
        }
    }
}

impl IndexWeights {
    fn named(&self) -> [(&'static str, f64); 12] {
        [
            ("hit_weight", self.hit_weight),
            ("out_weight", self.out_weight),
            ("assist_weight", self.assist_weight),
            ("caught_out_weight", self.caught_out_weight),
            ("efficiency_weight", self.efficiency_weight),
            ("block_weight", self.block_weight),
            ("catch_weight", self.catch_weight),
            ("dodge_weight", self.dodge_weight),
            ("effortless_dodge_weight", self.effortless_dodge_weight),
            ("exposure_weight", self.exposure_weight),
            ("attack_weight", self.attack_weight),
            ("defense_weight", self.defense_weight),
        ]
    }

    /// Reject NaN and infinite coefficients.
    pub fn validate(&self) -> Result<(), WeightsError> {
        match self.named().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(WeightsError::NonFinite(name)),
            None => Ok(()),
        }
    }
}
