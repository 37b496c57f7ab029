//! Raw per-player event counters and their validation boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised when raw counters are not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Counter `{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: i128 },

    #[error("Counter `{field}` is out of range (got {value})")]
    OutOfRange { field: &'static str, value: i128 },

    #[error("Malformed counters: {0}")]
    Malformed(String),

    #[error("Derived field `{0}` cannot be set directly; update the raw counters instead")]
    DerivedFieldWrite(String),

    #[error("Unknown counter field: {0}")]
    UnknownField(String),
}

/// Wire names of the raw counter fields.
pub const COUNTER_FIELDS: [&str; 16] = [
    "setsJugados",
    "tirosTotales",
    "hits",
    "quemados",
    "asistencias",
    "tirosRecibidos",
    "hitsRecibidos",
    "esquives",
    "esquivesSinEsfuerzo",
    "ponchado",
    "catchesIntentados",
    "catches",
    "bloqueosIntentados",
    "bloqueos",
    "pisoLinea",
    "catchesRecibidos",
];

/// Wire names of the computed fields. These are never accepted as input.
pub const DERIVED_FIELDS: [&str; 7] = [
    "porcentajeHits",
    "porcentajeOuts",
    "porcentajeCatches",
    "porcentajeBloqueos",
    "indiceAtaque",
    "indiceDefensa",
    "indicePoder",
];

/// Counters as they arrive from loosely-typed sources, before validation.
///
/// Missing fields default to 0. Fields are wide enough that any JSON integer
/// a `u64` can hold reaches `check` and is reported as out of range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UncheckedCounters {
    pub sets_jugados: i128,
    pub tiros_totales: i128,
    pub hits: i128,
    pub quemados: i128,
    pub asistencias: i128,
    pub tiros_recibidos: i128,
    pub hits_recibidos: i128,
    pub esquives: i128,
    pub esquives_sin_esfuerzo: i128,
    pub ponchado: i128,
    pub catches_intentados: i128,
    pub catches: i128,
    pub bloqueos_intentados: i128,
    pub bloqueos: i128,
    pub piso_linea: i128,
    pub catches_recibidos: i128,
}

fn check(field: &'static str, value: i128) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

/// Raw event counters for one player in one scope (season, event, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UncheckedCounters")]
pub struct RawCounters {
    /// Sets played; normalization denominator for both indices
    pub sets_jugados: u32,

    /// Shots taken
    pub tiros_totales: u32,
    pub hits: u32,
    /// Outs scored
    pub quemados: u32,
    pub asistencias: u32,

    /// Shots faced
    pub tiros_recibidos: u32,
    pub hits_recibidos: u32,
    pub esquives: u32,
    pub esquives_sin_esfuerzo: u32,
    /// Times put out
    pub ponchado: u32,

    pub catches_intentados: u32,
    pub catches: u32,
    pub bloqueos_intentados: u32,
    pub bloqueos: u32,

    /// Line faults
    pub piso_linea: u32,
    /// Times caught out by an opponent
    pub catches_recibidos: u32,
}

impl TryFrom<UncheckedCounters> for RawCounters {
    type Error = ValidationError;

    fn try_from(raw: UncheckedCounters) -> Result<Self, Self::Error> {
        Ok(Self {
            sets_jugados: check("setsJugados", raw.sets_jugados)?,
            tiros_totales: check("tirosTotales", raw.tiros_totales)?,
            hits: check("hits", raw.hits)?,
            quemados: check("quemados", raw.quemados)?,
            asistencias: check("asistencias", raw.asistencias)?,
            tiros_recibidos: check("tirosRecibidos", raw.tiros_recibidos)?,
            hits_recibidos: check("hitsRecibidos", raw.hits_recibidos)?,
            esquives: check("esquives", raw.esquives)?,
            esquives_sin_esfuerzo: check("esquivesSinEsfuerzo", raw.esquives_sin_esfuerzo)?,
            ponchado: check("ponchado", raw.ponchado)?,
            catches_intentados: check("catchesIntentados", raw.catches_intentados)?,
            catches: check("catches", raw.catches)?,
            bloqueos_intentados: check("bloqueosIntentados", raw.bloqueos_intentados)?,
            bloqueos: check("bloqueos", raw.bloqueos)?,
            piso_linea: check("pisoLinea", raw.piso_linea)?,
            catches_recibidos: check("catchesRecibidos", raw.catches_recibidos)?,
        })
    }
}

/// A data-quality problem in otherwise well-formed counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQualityIssue {
    CatchesExceedAttempts { catches: u32, attempts: u32 },
    BlocksExceedAttempts { blocks: u32, attempts: u32 },
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityIssue::CatchesExceedAttempts { catches, attempts } => {
                write!(f, "catches ({}) exceed catchesIntentados ({})", catches, attempts)
            }
            DataQualityIssue::BlocksExceedAttempts { blocks, attempts } => {
                write!(f, "bloqueos ({}) exceed bloqueosIntentados ({})", blocks, attempts)
            }
        }
    }
}

impl RawCounters {
    /// Apply a partial update of counter fields and return the new counters.
    ///
    /// Derived fields are rejected: the only way to change a metric is to
    /// change the counters it is computed from.
    pub fn apply_update(&self, update: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut merged = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ValidationError::Malformed("counters are not an object".into())),
            Err(e) => return Err(ValidationError::Malformed(e.to_string())),
        };

        for (key, value) in update {
            if DERIVED_FIELDS.contains(&key.as_str()) {
                return Err(ValidationError::DerivedFieldWrite(key.clone()));
            }
            if !COUNTER_FIELDS.contains(&key.as_str()) {
                return Err(ValidationError::UnknownField(key.clone()));
            }
            merged.insert(key.clone(), value.clone());
        }

        let unchecked: UncheckedCounters = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Self::try_from(unchecked)
    }

    /// Add another set of counters (e.g. one more game) to these totals.
    pub fn accumulate(&self, other: &RawCounters) -> RawCounters {
        RawCounters {
            sets_jugados: self.sets_jugados.saturating_add(other.sets_jugados),
            tiros_totales: self.tiros_totales.saturating_add(other.tiros_totales),
            hits: self.hits.saturating_add(other.hits),
            quemados: self.quemados.saturating_add(other.quemados),
            asistencias: self.asistencias.saturating_add(other.asistencias),
            tiros_recibidos: self.tiros_recibidos.saturating_add(other.tiros_recibidos),
            hits_recibidos: self.hits_recibidos.saturating_add(other.hits_recibidos),
            esquives: self.esquives.saturating_add(other.esquives),
            esquives_sin_esfuerzo: self
                .esquives_sin_esfuerzo
                .saturating_add(other.esquives_sin_esfuerzo),
            ponchado: self.ponchado.saturating_add(other.ponchado),
            catches_intentados: self.catches_intentados.saturating_add(other.catches_intentados),
            catches: self.catches.saturating_add(other.catches),
            bloqueos_intentados: self
                .bloqueos_intentados
                .saturating_add(other.bloqueos_intentados),
            bloqueos: self.bloqueos.saturating_add(other.bloqueos),
            piso_linea: self.piso_linea.saturating_add(other.piso_linea),
            catches_recibidos: self.catches_recibidos.saturating_add(other.catches_recibidos),
        }
    }

    /// Report successes that exceed their attempts. Not enforced.
    pub fn data_quality_issues(&self) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();

        if self.catches > self.catches_intentados {
            issues.push(DataQualityIssue::CatchesExceedAttempts {
                catches: self.catches,
                attempts: self.catches_intentados,
            });
        }
        if self.bloqueos > self.bloqueos_intentados {
            issues.push(DataQualityIssue::BlocksExceedAttempts {
                blocks: self.bloqueos,
                attempts: self.bloqueos_intentados,
            });
        }

        issues
    }
}
