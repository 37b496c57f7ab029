//! Player records and their scored form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DerivedMetrics, EntityId, PlayerId, RawCounters, ScopeId, TeamId, ValidationError};

/// One player's raw counters within one scope, as supplied by the
/// surrounding system.
///
/// Any derived fields present in stored input (e.g. a stale `indicePoder`)
/// are ignored on read; metrics are always recomputed from `counters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Comparison universe (season, event)
    pub scope: ScopeId,

    /// Team reference
    pub equipo: TeamId,

    /// Player reference; derived from team and name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jugador: Option<PlayerId>,

    /// Given name
    pub nombre: String,

    /// Surname
    pub apellido: String,

    #[serde(flatten)]
    pub counters: RawCounters,
}

impl PlayerRecord {
    /// Create a record with zeroed counters.
    pub fn new(scope: ScopeId, equipo: TeamId, nombre: String, apellido: String) -> Self {
        Self {
            scope,
            equipo,
            jugador: None,
            nombre,
            apellido,
            counters: RawCounters::default(),
        }
    }

    /// Builder method to set an explicit player reference.
    pub fn with_jugador(mut self, jugador: PlayerId) -> Self {
        self.jugador = Some(jugador);
        self
    }

    /// Builder method to set counters.
    pub fn with_counters(mut self, counters: RawCounters) -> Self {
        self.counters = counters;
        self
    }

    /// The player reference, generated from (equipo, apellido, nombre) if
    /// the record does not carry one.
    pub fn player_id(&self) -> PlayerId {
        match &self.jugador {
            Some(id) => id.clone(),
            None => EntityId::generate(&[self.equipo.as_str(), &self.apellido, &self.nombre]),
        }
    }

    /// Apply a partial counter update. Attempts to write a derived field are
    /// rejected and leave the record unchanged.
    pub fn update_counters(&mut self, update: &Map<String, Value>) -> Result<(), ValidationError> {
        self.counters = self.counters.apply_update(update)?;
        Ok(())
    }
}

/// Sum rows that belong to the same player in the same scope (e.g. one row
/// per game) into one record per player.
///
/// The first row of each player keeps its position and identity fields.
pub fn merge_by_player(records: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let mut merged: Vec<PlayerRecord> = Vec::with_capacity(records.len());
    let mut index: HashMap<(ScopeId, PlayerId), usize> = HashMap::new();

    for record in records {
        let key = (record.scope.clone(), record.player_id());
        match index.get(&key) {
            Some(&pos) => {
                let totals = &mut merged[pos].counters;
                *totals = totals.accumulate(&record.counters);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// A player record with freshly computed metrics, ready for ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEntry {
    pub scope: ScopeId,
    pub equipo: TeamId,
    pub jugador: PlayerId,
    pub nombre: String,
    pub apellido: String,
    tiros_totales: u32,
    #[serde(flatten)]
    metrics: DerivedMetrics,
}

impl ScoredEntry {
    pub(crate) fn new(record: &PlayerRecord, metrics: DerivedMetrics) -> Self {
        Self {
            scope: record.scope.clone(),
            equipo: record.equipo.clone(),
            jugador: record.player_id(),
            nombre: record.nombre.clone(),
            apellido: record.apellido.clone(),
            tiros_totales: record.counters.tiros_totales,
            metrics,
        }
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    /// Shots taken, copied from the counters at scoring time. Second tie-break key.
    pub fn tiros_totales(&self) -> u32 {
        self.tiros_totales
    }

    /// "Apellido, Nombre"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.apellido, self.nombre)
    }
}

/// A scored entry with its 1-based position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: ScoredEntry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> PlayerRecord {
        PlayerRecord::new(
            "temporada-2024".into(),
            "halcones".into(),
            "Felipe".to_string(),
            "Rojas".to_string(),
        )
        .with_counters(RawCounters {
            hits: 20,
            tiros_totales: 61,
            ..Default::default()
        })
    }

    #[test]
    fn test_player_record_deserialize_flat() {
        let line = r#"{"scope":"temporada-2024","equipo":"halcones","jugador":"p-7",
            "nombre":"Felipe","apellido":"Rojas","hits":20,"tirosTotales":61,"setsJugados":9}"#;
        let record: PlayerRecord = serde_json::from_str(line).unwrap();

        assert_eq!(record.jugador, Some(PlayerId::from("p-7")));
        assert_eq!(record.counters.hits, 20);
        assert_eq!(record.counters.tiros_totales, 61);
        assert_eq!(record.counters.sets_jugados, 9);
        assert_eq!(record.counters.catches, 0);
    }

    #[test]
    fn test_player_record_ignores_stored_derived_fields() {
        let line = r#"{"scope":"s","equipo":"e","nombre":"A","apellido":"B",
            "hits":1,"indicePoder":90.62,"porcentajeHits":100}"#;
        let record: PlayerRecord = serde_json::from_str(line).unwrap();

        assert_eq!(record.counters.hits, 1);
        let back = serde_json::to_value(&record).unwrap();
        assert!(back.get("indicePoder").is_none());
        assert!(back.get("porcentajeHits").is_none());
    }

    #[test]
    fn test_player_record_rejects_negative_counter() {
        let line = r#"{"scope":"s","equipo":"e","nombre":"A","apellido":"B","hits":-4}"#;
        let result: Result<PlayerRecord, _> = serde_json::from_str(line);
        assert!(result.is_err());
    }

    #[test]
    fn test_player_id_generated_when_missing() {
        let record = sample_record();
        let id = record.player_id();
        assert_eq!(id, EntityId::generate(&["halcones", "Rojas", "Felipe"]));

        let explicit = sample_record().with_jugador("p-1".into());
        assert_eq!(explicit.player_id().as_str(), "p-1");
    }

    #[test]
    fn test_update_counters_rejects_derived_write() {
        let mut record = sample_record();
        let before = record.counters;

        let update = json!({"indicePoder": 90.62});
        let err = record.update_counters(update.as_object().unwrap()).unwrap_err();

        assert_eq!(err, ValidationError::DerivedFieldWrite("indicePoder".to_string()));
        assert_eq!(record.counters, before);
    }

    #[test]
    fn test_update_counters_applies() {
        let mut record = sample_record();
        let update = json!({"hits": 21, "tirosTotales": 62});
        record.update_counters(update.as_object().unwrap()).unwrap();

        assert_eq!(record.counters.hits, 21);
        assert_eq!(record.counters.tiros_totales, 62);
    }

    #[test]
    fn test_merge_by_player_sums_game_rows() {
        let game = |scope: &str, hits: u32| {
            PlayerRecord::new(scope.into(), "halcones".into(), "Felipe".into(), "Rojas".into())
                .with_counters(RawCounters {
                    sets_jugados: 3,
                    hits,
                    ..Default::default()
                })
        };
        let other = PlayerRecord::new("s1".into(), "lobos".into(), "Ana".into(), "Ortiz".into())
            .with_jugador("p-ana".into());

        let merged = merge_by_player(vec![game("s1", 7), other, game("s1", 4), game("s2", 2)]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].apellido, "Rojas");
        assert_eq!(merged[0].counters.hits, 11);
        assert_eq!(merged[0].counters.sets_jugados, 6);
        assert_eq!(merged[1].apellido, "Ortiz");
        assert_eq!(merged[2].scope.as_str(), "s2");
        assert_eq!(merged[2].counters.hits, 2);
    }

    #[test]
    fn test_display_name() {
        let metrics = DerivedMetrics {
            porcentaje_hits: 0.0,
            porcentaje_outs: 0.0,
            porcentaje_catches: 0.0,
            porcentaje_bloqueos: 0.0,
            indice_ataque: 0.0,
            indice_defensa: 0.0,
            indice_poder: 0.0,
        };
        let entry = ScoredEntry::new(&sample_record(), metrics);
        assert_eq!(entry.display_name(), "Rojas, Felipe");
        assert_eq!(entry.tiros_totales(), 61);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["tirosTotales"], 61);
    }
}
