//! Ranked standings for one scope.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PlayerId, RankedEntry, ScopeId};

/// A ranking of one scope, built on request and never persisted as a
/// source of truth.
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    /// Scope that was ranked
    pub scope: ScopeId,

    /// When these standings were computed
    pub computed_at: DateTime<Utc>,

    /// Entries in rank order
    pub entries: Vec<RankedEntry>,
}

impl Standings {
    /// Create new Standings.
    pub fn new(scope: ScopeId, entries: Vec<RankedEntry>) -> Self {
        Self {
            scope,
            computed_at: Utc::now(),
            entries,
        }
    }

    /// Entries sharing rank 1.
    pub fn leaders(&self) -> Vec<&RankedEntry> {
        self.entries.iter().filter(|e| e.rank == 1).collect()
    }

    /// Find a player's entry.
    pub fn find_player(&self, jugador: &PlayerId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| &e.entry.jugador == jugador)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
