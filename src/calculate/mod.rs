//! Performance index engine.
//!
//! Turns one player's raw counters into:
//! - Hit, out, catch and block percentages
//! - Attack and defense sub-indices
//! - The composite power index
//!
//! Every ratio with a zero denominator evaluates to 0. Rounding to two
//! decimals happens once, on the final values.

mod weights;

pub use weights::*;

use serde::Serialize;

use crate::models::{
    DerivedMetrics, PlayerId, PlayerRecord, RawCounters, ScopeId, ScoredEntry, TeamId,
};

/// Round to two decimal places. Never returns negative zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: f64, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

fn percentage(successes: u32, attempts: u32) -> f64 {
    // successes > attempts is a data-quality problem upstream; cap the share
    (100.0 * ratio(successes as f64, attempts)).min(100.0)
}

/// Every intermediate term of the computation, unrounded.
///
/// Read-only: the only way to obtain one is `MetricComputer::breakdown`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexBreakdown {
    porcentaje_hits: f64,
    porcentaje_outs: f64,
    porcentaje_catches: f64,
    porcentaje_bloqueos: f64,

    acciones_ofensivas: f64,
    eficiencia_ofensiva: f64,
    indice_ataque: f64,

    acciones_defensivas: f64,
    impacto_negativo: f64,
    defensa_neta: f64,
    bonus_exposicion: f64,
    indice_defensa: f64,

    indice_poder: f64,
}

impl IndexBreakdown {
    /// Round the final values.
    pub(crate) fn to_metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            porcentaje_hits: round2(self.porcentaje_hits),
            porcentaje_outs: round2(self.porcentaje_outs),
            porcentaje_catches: round2(self.porcentaje_catches),
            porcentaje_bloqueos: round2(self.porcentaje_bloqueos),
            indice_ataque: round2(self.indice_ataque),
            indice_defensa: round2(self.indice_defensa),
            indice_poder: round2(self.indice_poder),
        }
    }

    pub fn porcentaje_hits(&self) -> f64 {
        self.porcentaje_hits
    }

    pub fn porcentaje_outs(&self) -> f64 {
        self.porcentaje_outs
    }

    pub fn porcentaje_catches(&self) -> f64 {
        self.porcentaje_catches
    }

    pub fn porcentaje_bloqueos(&self) -> f64 {
        self.porcentaje_bloqueos
    }

    /// Weighted offensive actions before workload normalization.
    pub fn acciones_ofensivas(&self) -> f64 {
        self.acciones_ofensivas
    }

    pub fn eficiencia_ofensiva(&self) -> f64 {
        self.eficiencia_ofensiva
    }

    pub fn indice_ataque(&self) -> f64 {
        self.indice_ataque
    }

    pub fn acciones_defensivas(&self) -> f64 {
        self.acciones_defensivas
    }

    pub fn impacto_negativo(&self) -> f64 {
        self.impacto_negativo
    }

    /// Defensive actions minus hits taken that were not caught or blocked.
    pub fn defensa_neta(&self) -> f64 {
        self.defensa_neta
    }

    /// Bonus for shots faced.
    pub fn bonus_exposicion(&self) -> f64 {
        self.bonus_exposicion
    }

    pub fn indice_defensa(&self) -> f64 {
        self.indice_defensa
    }

    pub fn indice_poder(&self) -> f64 {
        self.indice_poder
    }
}

/// One player's breakdown, as emitted by `compute --breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub scope: ScopeId,
    pub equipo: TeamId,
    pub jugador: PlayerId,
    #[serde(flatten)]
    pub breakdown: IndexBreakdown,
}

/// Computes derived metrics under a fixed weight table.
#[derive(Debug, Clone, Default)]
pub struct MetricComputer {
    weights: IndexWeights,
}

impl MetricComputer {
    /// Build a computer for the given table, rejecting non-finite weights.
    pub fn new(weights: IndexWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &IndexWeights {
        &self.weights
    }

    /// Compute the rounded metrics for one set of counters.
    pub fn compute(&self, raw: &RawCounters) -> DerivedMetrics {
        self.breakdown(raw).to_metrics()
    }

    /// Compute every term without rounding.
    pub fn breakdown(&self, raw: &RawCounters) -> IndexBreakdown {
        let w = &self.weights;

        let acciones_ofensivas = w.hit_weight * raw.hits as f64
            + w.out_weight * raw.quemados as f64
            + w.assist_weight * raw.asistencias as f64
            - w.caught_out_weight * raw.catches_recibidos as f64;
        let eficiencia_ofensiva = ratio(acciones_ofensivas, raw.tiros_totales);

        let acciones_defensivas = w.block_weight * raw.bloqueos as f64
            + w.catch_weight * raw.catches as f64
            + w.dodge_weight * raw.esquives as f64
            + w.effortless_dodge_weight * raw.esquives_sin_esfuerzo as f64;
        let impacto_negativo =
            raw.hits_recibidos as f64 - raw.catches as f64 - raw.bloqueos as f64;
        let defensa_neta = acciones_defensivas - impacto_negativo;
        let bonus_exposicion = w.exposure_weight * (raw.tiros_recibidos as f64).sqrt();

        let (indice_ataque, indice_defensa) = if raw.sets_jugados > 0 {
            let divisor = w.workload_scaling.divisor(raw.sets_jugados);
            (
                acciones_ofensivas / divisor + w.efficiency_weight * eficiencia_ofensiva,
                defensa_neta / divisor + bonus_exposicion,
            )
        } else {
            (0.0, 0.0)
        };

        let indice_poder = w.attack_weight * indice_ataque + w.defense_weight * indice_defensa;

        IndexBreakdown {
            porcentaje_hits: percentage(raw.hits, raw.tiros_totales),
            porcentaje_outs: percentage(raw.ponchado, raw.tiros_recibidos),
            porcentaje_catches: percentage(raw.catches, raw.catches_intentados),
            porcentaje_bloqueos: percentage(raw.bloqueos, raw.bloqueos_intentados),
            acciones_ofensivas,
            eficiencia_ofensiva,
            indice_ataque,
            acciones_defensivas,
            impacto_negativo,
            defensa_neta,
            bonus_exposicion,
            indice_defensa,
            indice_poder,
        }
    }

    /// Score one player record.
    pub fn score(&self, record: &PlayerRecord) -> ScoredEntry {
        ScoredEntry::new(record, self.compute(&record.counters))
    }

    /// Score a batch of player records, preserving input order.
    pub fn score_all(&self, records: &[PlayerRecord]) -> Vec<ScoredEntry> {
        records.iter().map(|r| self.score(r)).collect()
    }

    /// Unrounded breakdown for each record, preserving input order.
    pub fn breakdown_all(&self, records: &[PlayerRecord]) -> Vec<BreakdownEntry> {
        records
            .iter()
            .map(|r| BreakdownEntry {
                scope: r.scope.clone(),
                equipo: r.equipo.clone(),
                jugador: r.player_id(),
                breakdown: self.breakdown(&r.counters),
            })
            .collect()
    }
}
