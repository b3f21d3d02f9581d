//! Append-only ledger of rating events, the system's source of truth.
//!
//! Events are never edited in place; a mistaken outcome is neutralized
//! by appending a compensating event that points back at the original.
//! The ledger can run purely in memory or replay/append a JSON-lines
//! file so that history survives restarts.

use crate::entrant::EntrantId;
use crate::error::{RatingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AWins,
    BWins,
    Draw,
}

impl Outcome {
    /// Actual score of entrant A; entrant B's score is the complement.
    pub fn score_a(self) -> f64 {
        match self {
            Outcome::AWins => 1.,
            Outcome::BWins => 0.,
            Outcome::Draw => 0.5,
        }
    }

    /// The same result seen from the other chair.
    pub fn flipped(self) -> Self {
        match self {
            Outcome::AWins => Outcome::BWins,
            Outcome::BWins => Outcome::AWins,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

/// Immutable record of one decided debate's effect on two ratings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub id: u64,
    pub debate_id: Uuid,
    pub entrant_a: EntrantId,
    pub entrant_b: EntrantId,
    pub outcome: Outcome,
    pub rating_a_before: i32,
    pub rating_a_after: i32,
    pub rating_b_before: i32,
    pub rating_b_after: i32,
    pub timestamp: DateTime<Utc>,
    /// Id of the event this one compensates, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverses: Option<u64>,
}

impl RatingEvent {
    pub fn delta_a(&self) -> i32 {
        self.rating_a_after - self.rating_a_before
    }

    pub fn delta_b(&self) -> i32 {
        self.rating_b_after - self.rating_b_before
    }

    pub fn touches(&self, entrant: EntrantId) -> bool {
        self.entrant_a == entrant || self.entrant_b == entrant
    }

    pub fn delta_for(&self, entrant: EntrantId) -> Option<i32> {
        if entrant == self.entrant_a {
            Some(self.delta_a())
        } else if entrant == self.entrant_b {
            Some(self.delta_b())
        } else {
            None
        }
    }

    pub fn rating_after_for(&self, entrant: EntrantId) -> Option<i32> {
        if entrant == self.entrant_a {
            Some(self.rating_a_after)
        } else if entrant == self.entrant_b {
            Some(self.rating_b_after)
        } else {
            None
        }
    }

    pub fn check_invariants(&self, max_delta: i32) -> Result<()> {
        if self.entrant_a == self.entrant_b {
            return Err(RatingError::InvariantViolation(format!(
                "event {} lists entrant {} on both sides",
                self.id, self.entrant_a
            )));
        }
        if self.delta_a() + self.delta_b() != 0 {
            return Err(RatingError::InvariantViolation(format!(
                "event {} is not zero-sum: deltas {} and {}",
                self.id,
                self.delta_a(),
                self.delta_b()
            )));
        }
        if self.delta_a().abs() > max_delta {
            return Err(RatingError::InvariantViolation(format!(
                "event {} moves {} points, more than the bound {}",
                self.id,
                self.delta_a().abs(),
                max_delta
            )));
        }
        Ok(())
    }
}

pub struct RatingLedger {
    // Kept in id order; appends clamp timestamps monotone so that id
    // order and (timestamp, id) order always agree.
    events: Vec<RatingEvent>,
    by_debate: HashMap<Uuid, usize>,
    // original event id -> reversal event id
    reversals: HashMap<u64, u64>,
    sink: Option<BufWriter<File>>,
}

impl RatingLedger {
    /// An empty, memory-only ledger.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            by_debate: HashMap::new(),
            reversals: HashMap::new(),
            sink: None,
        }
    }

    /// Opens a file-backed ledger, replaying any events already on
    /// disk. Each subsequent append writes and flushes one JSON line.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut ledger = Self::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let event: RatingEvent = serde_json::from_str(&line)?;
                ledger.index(event);
            }
            tracing::info!(
                "Replayed {} rating events from {}",
                ledger.events.len(),
                path.display()
            );
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        ledger.sink = Some(BufWriter::new(file));
        Ok(ledger)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Id the next appended event must carry.
    pub fn next_event_id(&self) -> u64 {
        self.events.last().map_or(1, |ev| ev.id + 1)
    }

    /// Wall-clock now, clamped so the ledger's timestamps never move
    /// backwards. The ledger timestamp is authoritative for ordering.
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.events.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }

    pub fn get(&self, event_id: u64) -> Option<&RatingEvent> {
        let idx = self
            .events
            .binary_search_by_key(&event_id, |ev| ev.id)
            .ok()?;
        self.events.get(idx)
    }

    pub fn find_by_debate(&self, debate_id: Uuid) -> Option<&RatingEvent> {
        self.by_debate.get(&debate_id).map(|&idx| &self.events[idx])
    }

    /// Whether a compensating event has been recorded for `event_id`.
    pub fn is_reversed(&self, event_id: u64) -> bool {
        self.reversals.contains_key(&event_id)
    }

    /// Validates and durably appends `event`, then indexes it.
    ///
    /// Nothing is mutated unless every check passes and the event has
    /// been written out, so a failed append leaves no partial state.
    pub fn append(&mut self, event: RatingEvent, max_delta: i32) -> Result<&RatingEvent> {
        event.check_invariants(max_delta)?;
        if event.id != self.next_event_id() {
            return Err(RatingError::InvariantViolation(format!(
                "event id {} breaks the ledger sequence (expected {})",
                event.id,
                self.next_event_id()
            )));
        }
        if let Some(last) = self.events.last() {
            if event.timestamp < last.timestamp {
                return Err(RatingError::InvariantViolation(format!(
                    "event {} is timestamped before its predecessor",
                    event.id
                )));
            }
        }
        match event.reverses {
            None => {
                if let Some(existing) = self.find_by_debate(event.debate_id) {
                    return Err(RatingError::DuplicateEvent {
                        existing: Box::new(existing.clone()),
                    });
                }
            }
            Some(original_id) => {
                let original = self
                    .get(original_id)
                    .ok_or(RatingError::EventNotFound(original_id))?;
                if original.reverses.is_some() {
                    return Err(RatingError::NotReversible(original_id));
                }
                if self.is_reversed(original_id) {
                    return Err(RatingError::AlreadyReversed(original_id));
                }
            }
        }
        if let Some(sink) = &mut self.sink {
            let line = serde_json::to_string(&event)?;
            writeln!(sink, "{}", line)?;
            sink.flush()?;
        }
        self.index(event);
        Ok(self.events.last().expect("event was just appended"))
    }

    fn index(&mut self, event: RatingEvent) {
        let idx = self.events.len();
        match event.reverses {
            None => {
                self.by_debate.insert(event.debate_id, idx);
            }
            Some(original_id) => {
                self.reversals.insert(original_id, event.id);
            }
        }
        self.events.push(event);
    }

    /// All events in (timestamp, id) order.
    pub fn events(&self) -> impl Iterator<Item = &RatingEvent> {
        self.events.iter()
    }

    /// Events touching `entrant`, optionally restricted to timestamps
    /// at or after `since`, in (timestamp, id) order. Lazy and
    /// restartable; finite at the ledger's size at call time.
    pub fn events_for(
        &self,
        entrant: EntrantId,
        since: Option<DateTime<Utc>>,
    ) -> impl Iterator<Item = &RatingEvent> {
        self.events.iter().filter(move |ev| {
            ev.touches(entrant) && since.is_none_or(|cutoff| ev.timestamp >= cutoff)
        })
    }
}

impl Default for RatingLedger {
    fn default() -> Self {
        Self::new()
    }
}
