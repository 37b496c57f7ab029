//! Derived performance metrics.

use serde::Serialize;

/// Percentages and indices computed from one player's raw counters.
///
/// There is no public constructor and no setter: a value of this type only
/// ever comes out of `MetricComputer::compute`, so it always matches the
/// counters it was computed from. It is serialize-only for the same reason.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub(crate) porcentaje_hits: f64,
    pub(crate) porcentaje_outs: f64,
    pub(crate) porcentaje_catches: f64,
    pub(crate) porcentaje_bloqueos: f64,
    pub(crate) indice_ataque: f64,
    pub(crate) indice_defensa: f64,
    pub(crate) indice_poder: f64,
}

impl DerivedMetrics {
    /// Hits per shot taken, 0-100.
    pub fn porcentaje_hits(&self) -> f64 {
        self.porcentaje_hits
    }

    /// Times put out per shot faced, 0-100.
    pub fn porcentaje_outs(&self) -> f64 {
        self.porcentaje_outs
    }

    /// Successful catches per attempt, 0-100.
    pub fn porcentaje_catches(&self) -> f64 {
        self.porcentaje_catches
    }

    /// Successful blocks per attempt, 0-100.
    pub fn porcentaje_bloqueos(&self) -> f64 {
        self.porcentaje_bloqueos
    }

    pub fn indice_ataque(&self) -> f64 {
        self.indice_ataque
    }

    pub fn indice_defensa(&self) -> f64 {
        self.indice_defensa
    }

    /// Composite power index.
    pub fn indice_poder(&self) -> f64 {
        self.indice_poder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics_wire_names() {
        let metrics = DerivedMetrics {
            porcentaje_hits: 32.79,
            porcentaje_outs: 0.0,
            porcentaje_catches: 0.0,
            porcentaje_bloqueos: 0.0,
            indice_ataque: 10.08,
            indice_defensa: 5.79,
            indice_poder: 8.36,
        };

        let value = serde_json::to_value(metrics).unwrap();
        assert_eq!(value["porcentajeHits"], 32.79);
        assert_eq!(value["indiceAtaque"], 10.08);
        assert_eq!(value["indiceDefensa"], 5.79);
        assert_eq!(value["indicePoder"], 8.36);
        assert_eq!(value.as_object().unwrap().len(), 7);
    }
}
