//! Current-rating projection: a cache over the ledger, rebuilt by
//! folding it. The ledger stays the only independent truth.

use crate::elo::RatingConfig;
use crate::entrant::EntrantId;
use crate::error::{RatingError, Result};
use crate::ledger::{Outcome, RatingEvent, RatingLedger};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Capacity of the rolling recent-outcome window kept per entrant.
pub const RECENT_WINDOW: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentOutcome {
    Win,
    Loss,
    Draw,
}

fn seen_by(outcome: Outcome, is_side_a: bool) -> RecentOutcome {
    let outcome = if is_side_a { outcome } else { outcome.flipped() };
    match outcome {
        Outcome::AWins => RecentOutcome::Win,
        Outcome::BWins => RecentOutcome::Loss,
        Outcome::Draw => RecentOutcome::Draw,
    }
}

/// One entrant's current standing-relevant state. Always equal to the
/// fold of all ledger events touching the entrant, in ledger order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub rating: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Last `RECENT_WINDOW` outcomes, oldest first, FIFO eviction.
    pub recent: VecDeque<RecentOutcome>,
    pub events_applied: u64,
    /// 0 until the first event is applied.
    pub last_event_id: u64,
}

impl RatingSnapshot {
    pub fn baseline(config: &RatingConfig) -> Self {
        Self {
            rating: config.baseline,
            wins: 0,
            losses: 0,
            draws: 0,
            recent: VecDeque::with_capacity(RECENT_WINDOW),
            events_applied: 0,
            last_event_id: 0,
        }
    }

    pub fn total_debates(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    fn record(&mut self, event_id: u64, rating_after: i32, outcome: RecentOutcome) {
        self.rating = rating_after;
        match outcome {
            RecentOutcome::Win => self.wins += 1,
            RecentOutcome::Loss => self.losses += 1,
            RecentOutcome::Draw => self.draws += 1,
        }
        if self.recent.len() == RECENT_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(outcome);
        self.events_applied += 1;
        self.last_event_id = event_id;
    }

    // Undo one outcome's contribution: the compensating event already
    // carries the corrected rating; counters shrink and the newest
    // matching window entry disappears instead of a new one arriving.
    fn retract(&mut self, event_id: u64, rating_after: i32, outcome: RecentOutcome) {
        self.rating = rating_after;
        match outcome {
            RecentOutcome::Win => self.wins = self.wins.saturating_sub(1),
            RecentOutcome::Loss => self.losses = self.losses.saturating_sub(1),
            RecentOutcome::Draw => self.draws = self.draws.saturating_sub(1),
        }
        if let Some(pos) = self.recent.iter().rposition(|&o| o == outcome) {
            self.recent.remove(pos);
        }
        self.events_applied += 1;
        self.last_event_id = event_id;
    }
}

pub struct RatingStore {
    config: RatingConfig,
    snapshots: HashMap<EntrantId, RatingSnapshot>,
}

impl RatingStore {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            snapshots: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Current snapshot, or the baseline for entrants with no events.
    pub fn current(&self, entrant: EntrantId) -> RatingSnapshot {
        self.snapshots
            .get(&entrant)
            .cloned()
            .unwrap_or_else(|| RatingSnapshot::baseline(&self.config))
    }

    pub fn rating(&self, entrant: EntrantId) -> i32 {
        self.snapshots
            .get(&entrant)
            .map_or(self.config.baseline, |snap| snap.rating)
    }

    /// Folds one event into both affected snapshots, exactly once and
    /// in ledger order. Both sides are validated before either is
    /// touched, so a rejected event mutates nothing.
    pub fn apply_event(&mut self, event: &RatingEvent) -> Result<()> {
        let mut snap_a = self.current(event.entrant_a);
        let mut snap_b = self.current(event.entrant_b);
        for (snap, before) in [
            (&snap_a, event.rating_a_before),
            (&snap_b, event.rating_b_before),
        ] {
            if snap.last_event_id >= event.id {
                return Err(RatingError::InvariantViolation(format!(
                    "event {} applied out of order: snapshot already at event {}",
                    event.id, snap.last_event_id
                )));
            }
            if snap.rating != before {
                return Err(RatingError::InvariantViolation(format!(
                    "event {} expects a before-rating of {} but the store holds {}",
                    event.id, before, snap.rating
                )));
            }
        }
        let outcome_a = seen_by(event.outcome, true);
        let outcome_b = seen_by(event.outcome, false);
        if event.reverses.is_some() {
            snap_a.retract(event.id, event.rating_a_after, outcome_a);
            snap_b.retract(event.id, event.rating_b_after, outcome_b);
        } else {
            snap_a.record(event.id, event.rating_a_after, outcome_a);
            snap_b.record(event.id, event.rating_b_after, outcome_b);
        }
        self.snapshots.insert(event.entrant_a, snap_a);
        self.snapshots.insert(event.entrant_b, snap_b);
        Ok(())
    }

    /// Discards the projection and re-folds the whole ledger. The
    /// recovery and audit path, also required after any K change.
    pub fn rebuild_from_ledger(&mut self, ledger: &RatingLedger) -> Result<()> {
        self.snapshots.clear();
        for event in ledger.events() {
            self.apply_event(event)?;
        }
        Ok(())
    }
}
