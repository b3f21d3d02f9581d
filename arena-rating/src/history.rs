//! Per-entrant rating time series, reconstructed from the ledger for
//! charting.

use crate::entrant::Entrant;
use crate::ledger::RatingLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub rating: i32,
}

/// The entrant's rating evolution: a baseline point at creation, then
/// one point per ledger event touching the entrant, in (timestamp, id)
/// order. The ledger timestamp is authoritative, so the sequence is
/// monotone in time regardless of ingestion interleaving.
pub fn series<'a>(
    ledger: &'a RatingLedger,
    entrant: &Entrant,
    baseline: i32,
) -> impl Iterator<Item = HistoryPoint> + use<'a> {
    let id = entrant.id;
    let origin = HistoryPoint {
        timestamp: entrant.created_at,
        rating: baseline,
    };
    std::iter::once(origin).chain(ledger.events_for(id, None).filter_map(move |event| {
        event.rating_after_for(id).map(|rating| HistoryPoint {
            timestamp: event.timestamp,
            rating,
        })
    }))
}
