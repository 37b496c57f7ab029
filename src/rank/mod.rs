//! Power rankings.
//!
//! Orders the scored entries of one scope by power index. Ties are broken by
//! attack index, then shot volume, then (surname, given name). Entries equal
//! on all of those share a rank; ranks are dense and 1-based.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

use crate::models::{PlayerId, RankedEntry, ScopeId, ScoredEntry, Standings};

/// Errors raised by the ranker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("Player {jugador} belongs to scope {found}, cannot rank it in scope {expected}")]
    ScopeMismatch {
        expected: ScopeId,
        found: ScopeId,
        jugador: PlayerId,
    },
}

/// Ordering that decides rank: best first.
fn compare_rank_key(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    let (ma, mb) = (a.metrics(), b.metrics());
    mb.indice_poder()
        .total_cmp(&ma.indice_poder())
        .then_with(|| mb.indice_ataque().total_cmp(&ma.indice_ataque()))
        .then_with(|| b.tiros_totales().cmp(&a.tiros_totales()))
        .then_with(|| a.apellido.cmp(&b.apellido))
        .then_with(|| a.nombre.cmp(&b.nombre))
}

/// Rank key plus identifiers, so output order never depends on input order.
fn compare_total(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    compare_rank_key(a, b)
        .then_with(|| a.jugador.cmp(&b.jugador))
        .then_with(|| a.equipo.cmp(&b.equipo))
}

/// Rank the entries of one scope.
///
/// Every entry must belong to `scope`; an empty input yields an empty ranking.
pub fn rank(
    mut entries: Vec<ScoredEntry>,
    scope: &ScopeId,
) -> Result<Vec<RankedEntry>, RankError> {
    if let Some(stray) = entries.iter().find(|e| &e.scope != scope) {
        return Err(RankError::ScopeMismatch {
            expected: scope.clone(),
            found: stray.scope.clone(),
            jugador: stray.jugador.clone(),
        });
    }

    entries.sort_by(compare_total);

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(entries.len());
    let mut current_rank = 0;
    for entry in entries {
        let tied = ranked
            .last()
            .is_some_and(|prev| compare_rank_key(&prev.entry, &entry) == Ordering::Equal);
        if !tied {
            current_rank += 1;
        }
        ranked.push(RankedEntry {
            rank: current_rank,
            entry,
        });
    }

    debug!("Ranked {} entries in scope {}", ranked.len(), scope);
    Ok(ranked)
}

/// Rank the entries of one scope and stamp the result.
pub fn standings(entries: Vec<ScoredEntry>, scope: &ScopeId) -> Result<Standings, RankError> {
    let ranked = rank(entries, scope)?;
    Ok(Standings::new(scope.clone(), ranked))
}
