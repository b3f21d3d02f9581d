//! Derived competitive views: ranked standings, trend over a window,
//! and pairwise head-to-head records.

use crate::entrant::{Entrant, EntrantId};
use crate::ledger::{Outcome, RatingLedger};
use crate::store::{RatingSnapshot, RatingStore};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    /// 1-based, contiguous; equal ratings still get distinct ranks.
    pub rank: usize,
    pub entrant: Entrant,
    pub snapshot: RatingSnapshot,
}

/// Ranks every registered entrant by current rating, descending.
/// Ties break by fewer total debates, then by entrant id, so repeated
/// calls with no intervening writes paginate identically.
pub fn ranked_standings<'a>(
    entrants: impl Iterator<Item = &'a Entrant>,
    store: &RatingStore,
) -> Vec<StandingRow> {
    entrants
        .map(|entrant| (entrant.clone(), store.current(entrant.id)))
        .sorted_by_key(|(entrant, snapshot)| {
            (
                Reverse(snapshot.rating),
                snapshot.total_debates(),
                entrant.id,
            )
        })
        .enumerate()
        .map(|(i, (entrant, snapshot))| StandingRow {
            rank: i + 1,
            entrant,
            snapshot,
        })
        .collect()
}

/// Sum of `entrant`'s rating deltas over its last `window` ledger
/// events. Shorter histories are summed as-is; no events means zero.
pub fn trend(ledger: &RatingLedger, entrant: EntrantId, window: usize) -> i32 {
    let deltas: Vec<i32> = ledger
        .events_for(entrant, None)
        .filter_map(|ev| ev.delta_for(entrant))
        .collect();
    let start = deltas.len().saturating_sub(window);
    deltas[start..].iter().sum()
}

/// Wins/losses/draws between one ordered pair of entrants, from the
/// first entrant's perspective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl HeadToHead {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Fraction of decided games won. Draws are excluded from the
    /// denominator; a pair with no decided games rates 0.
    pub fn win_rate(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            0.
        } else {
            f64::from(self.wins) / f64::from(decided)
        }
    }
}

/// Scans the ledger for debates between exactly this pair. Reversal
/// events and the events they compensate cancel out and are skipped.
pub fn head_to_head(ledger: &RatingLedger, entrant: EntrantId, opponent: EntrantId) -> HeadToHead {
    let mut record = HeadToHead::default();
    for event in ledger.events() {
        if event.reverses.is_some() || ledger.is_reversed(event.id) {
            continue;
        }
        let outcome = if (event.entrant_a, event.entrant_b) == (entrant, opponent) {
            event.outcome
        } else if (event.entrant_a, event.entrant_b) == (opponent, entrant) {
            event.outcome.flipped()
        } else {
            continue;
        };
        match outcome {
            Outcome::AWins => record.wins += 1,
            Outcome::BWins => record.losses += 1,
            Outcome::Draw => record.draws += 1,
        }
    }
    record
}
