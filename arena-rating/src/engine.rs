//! The `Arena` handle: the one authoritative object tying the entrant
//! registry, the ledger and the store together.
//!
//! A single `RwLock` guards all three. Writers (ingestion, reversal,
//! registration, rebuild) are serialized, which makes ledger append +
//! store update atomic and keeps rebuilds exclusive; readers share the
//! lock and always observe whole events, never half of one.

use crate::elo::{self, RatingConfig};
use crate::entrant::{DisplayName, Entrant, EntrantId, slugify};
use crate::error::{RatingError, Result};
use crate::history::{self, HistoryPoint};
use crate::ledger::{Outcome, RatingEvent, RatingLedger};
use crate::standings::{self, HeadToHead, StandingRow};
use crate::store::{RatingSnapshot, RatingStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::RwLock;
use uuid::Uuid;

const ENTRANTS_FILE: &str = "entrants.jsonl";
const EVENTS_FILE: &str = "rating_events.jsonl";

struct ArenaState {
    entrants: HashMap<EntrantId, Entrant>,
    slugs: HashMap<String, EntrantId>,
    ledger: RatingLedger,
    store: RatingStore,
    entrant_sink: Option<BufWriter<File>>,
}

impl ArenaState {
    fn register(&mut self, entrant: Entrant) -> Result<()> {
        if let Some(sink) = &mut self.entrant_sink {
            let line = serde_json::to_string(&entrant)?;
            writeln!(sink, "{}", line)?;
            sink.flush()?;
        }
        self.slugs.insert(entrant.slug.clone(), entrant.id);
        self.entrants.insert(entrant.id, entrant);
        Ok(())
    }

    fn require_entrant(&self, id: EntrantId) -> Result<()> {
        if self.entrants.contains_key(&id) {
            Ok(())
        } else {
            Err(RatingError::UnknownEntrant(id))
        }
    }
}

pub struct Arena {
    config: RatingConfig,
    state: RwLock<ArenaState>,
}

impl Arena {
    /// A memory-only arena; nothing survives the process.
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ArenaState {
                entrants: HashMap::new(),
                slugs: HashMap::new(),
                ledger: RatingLedger::new(),
                store: RatingStore::new(config),
                entrant_sink: None,
            }),
        }
    }

    /// Opens (or creates) a durable arena under `data_dir`: entrants
    /// and rating events each live in an append-only JSON-lines file,
    /// and the store is rebuilt by folding the replayed ledger.
    pub fn open(config: RatingConfig, data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let entrants_path = data_dir.join(ENTRANTS_FILE);
        let mut entrants = HashMap::new();
        let mut slugs = HashMap::new();
        if entrants_path.exists() {
            let reader = BufReader::new(File::open(&entrants_path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let entrant: Entrant = serde_json::from_str(&line)?;
                slugs.insert(entrant.slug.clone(), entrant.id);
                entrants.insert(entrant.id, entrant);
            }
            tracing::info!("Replayed {} entrants from {}", entrants.len(), entrants_path.display());
        }
        let entrant_sink = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&entrants_path)?,
        );

        let ledger = RatingLedger::open(data_dir.join(EVENTS_FILE))?;
        let mut store = RatingStore::new(config);
        store.rebuild_from_ledger(&ledger)?;

        Ok(Self {
            config,
            state: RwLock::new(ArenaState {
                entrants,
                slugs,
                ledger,
                store,
                entrant_sink: Some(entrant_sink),
            }),
        })
    }

    pub fn config(&self) -> RatingConfig {
        self.config
    }

    /// Registers a new entrant at the baseline rating. The slug is
    /// derived from the name; collisions get a numeric suffix and the
    /// result is stable for the entrant's lifetime.
    pub fn register_entrant(
        &self,
        name: DisplayName,
        provider: impl Into<String>,
    ) -> Result<Entrant> {
        let mut state = self.state.write().expect("arena lock poisoned");
        let base = slugify(name.as_ref());
        let mut slug = base.clone();
        let mut suffix = 2;
        while state.slugs.contains_key(&slug) {
            slug = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        let entrant = Entrant {
            id: EntrantId::new(),
            display_name: name.into_inner(),
            provider: provider.into(),
            slug,
            created_at: Utc::now(),
        };
        state.register(entrant.clone())?;
        tracing::info!("Registered entrant {} as {}", entrant.display_name, entrant.slug);
        Ok(entrant)
    }

    /// Scores one finalized debate: computes both deltas, appends the
    /// event to the ledger and folds it into the store, all under one
    /// write lock so the pair can never read a stale before-rating.
    ///
    /// A repeated `debate_id` yields `DuplicateEvent` carrying the
    /// original event; treat it as idempotent success.
    pub fn record_outcome(
        &self,
        debate_id: Uuid,
        entrant_a: EntrantId,
        entrant_b: EntrantId,
        outcome: Outcome,
    ) -> Result<RatingEvent> {
        let mut state = self.state.write().expect("arena lock poisoned");
        state.require_entrant(entrant_a)?;
        state.require_entrant(entrant_b)?;
        if entrant_a == entrant_b {
            return Err(RatingError::InvariantViolation(format!(
                "debate {} lists entrant {} on both sides",
                debate_id, entrant_a
            )));
        }

        let before_a = state.store.rating(entrant_a);
        let before_b = state.store.rating(entrant_b);
        let delta = elo::rating_delta(before_a, before_b, outcome.score_a(), self.config.k);
        let event = RatingEvent {
            id: state.ledger.next_event_id(),
            debate_id,
            entrant_a,
            entrant_b,
            outcome,
            rating_a_before: before_a,
            rating_a_after: before_a + delta,
            rating_b_before: before_b,
            rating_b_after: before_b - delta,
            timestamp: state.ledger.next_timestamp(),
            reverses: None,
        };
        let event = state
            .ledger
            .append(event, self.config.max_delta())?
            .clone();
        state.store.apply_event(&event)?;
        tracing::info!(
            "Scored debate {}: event {} moved {} points",
            debate_id,
            event.id,
            event.delta_a().abs()
        );
        Ok(event)
    }

    /// Appends a compensating event for `event_id`: the original
    /// deltas are handed back against the participants' current
    /// ratings, and the original outcome leaves the counters. History
    /// itself is never edited.
    pub fn reverse_event(&self, event_id: u64) -> Result<RatingEvent> {
        let mut state = self.state.write().expect("arena lock poisoned");
        let original = state
            .ledger
            .get(event_id)
            .ok_or(RatingError::EventNotFound(event_id))?
            .clone();
        if state.ledger.is_reversed(event_id) {
            return Err(RatingError::AlreadyReversed(event_id));
        }

        let before_a = state.store.rating(original.entrant_a);
        let before_b = state.store.rating(original.entrant_b);
        let event = RatingEvent {
            id: state.ledger.next_event_id(),
            debate_id: original.debate_id,
            entrant_a: original.entrant_a,
            entrant_b: original.entrant_b,
            outcome: original.outcome,
            rating_a_before: before_a,
            rating_a_after: before_a - original.delta_a(),
            rating_b_before: before_b,
            rating_b_after: before_b - original.delta_b(),
            timestamp: state.ledger.next_timestamp(),
            reverses: Some(event_id),
        };
        let event = state
            .ledger
            .append(event, self.config.max_delta())?
            .clone();
        state.store.apply_event(&event)?;
        tracing::info!("Reversed event {} with event {}", event_id, event.id);
        Ok(event)
    }

    /// Discards the projection and re-folds the entire ledger, holding
    /// the write lock so no ingestion can interleave.
    pub fn rebuild_from_ledger(&self) -> Result<()> {
        let mut state = self.state.write().expect("arena lock poisoned");
        let state = &mut *state;
        state.store.rebuild_from_ledger(&state.ledger)?;
        tracing::info!("Rebuilt the rating store from {} events", state.ledger.len());
        Ok(())
    }

    pub fn entrant(&self, id: EntrantId) -> Option<Entrant> {
        let state = self.state.read().expect("arena lock poisoned");
        state.entrants.get(&id).cloned()
    }

    pub fn entrant_by_slug(&self, slug: &str) -> Option<Entrant> {
        let state = self.state.read().expect("arena lock poisoned");
        let id = state.slugs.get(slug)?;
        state.entrants.get(id).cloned()
    }

    pub fn num_entrants(&self) -> usize {
        let state = self.state.read().expect("arena lock poisoned");
        state.entrants.len()
    }

    /// Current snapshot; baseline for entrants with no events yet.
    pub fn current(&self, entrant: EntrantId) -> RatingSnapshot {
        let state = self.state.read().expect("arena lock poisoned");
        state.store.current(entrant)
    }

    /// The full ranked leaderboard, deterministically ordered.
    pub fn standings(&self) -> Vec<StandingRow> {
        let state = self.state.read().expect("arena lock poisoned");
        standings::ranked_standings(state.entrants.values(), &state.store)
    }

    pub fn trend(&self, entrant: EntrantId, window: usize) -> i32 {
        let state = self.state.read().expect("arena lock poisoned");
        standings::trend(&state.ledger, entrant, window)
    }

    pub fn head_to_head(&self, entrant: EntrantId, opponent: EntrantId) -> HeadToHead {
        let state = self.state.read().expect("arena lock poisoned");
        standings::head_to_head(&state.ledger, entrant, opponent)
    }

    /// Rating series for charting; empty for unregistered ids.
    pub fn series(&self, entrant: EntrantId) -> Vec<HistoryPoint> {
        let state = self.state.read().expect("arena lock poisoned");
        match state.entrants.get(&entrant) {
            Some(subject) => {
                history::series(&state.ledger, subject, self.config.baseline).collect()
            }
            None => Vec::new(),
        }
    }

    /// Audit access to the raw ledger, in (timestamp, id) order.
    pub fn events(&self) -> Vec<RatingEvent> {
        let state = self.state.read().expect("arena lock poisoned");
        state.ledger.events().cloned().collect()
    }

    pub fn events_for(&self, entrant: EntrantId, since: Option<DateTime<Utc>>) -> Vec<RatingEvent> {
        let state = self.state.read().expect("arena lock poisoned");
        state.ledger.events_for(entrant, since).cloned().collect()
    }
}
