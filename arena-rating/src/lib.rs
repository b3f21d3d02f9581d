//! Competitive rating and standings engine for AI debate tournaments.
//!
//! A debate concludes with two participant ids and an outcome; this
//! crate turns that stream into an append-only rating ledger, a
//! current-rating projection, ranked standings, trends, head-to-head
//! records and per-entrant rating history.

pub mod elo;
pub mod engine;
pub mod entrant;
pub mod error;
pub mod history;
pub mod ledger;
pub mod standings;
pub mod store;

pub use elo::RatingConfig;
pub use engine::Arena;
pub use entrant::{DisplayName, Entrant, EntrantId};
pub use error::RatingError;
pub use history::HistoryPoint;
pub use ledger::{Outcome, RatingEvent, RatingLedger};
pub use standings::{HeadToHead, StandingRow};
pub use store::{RECENT_WINDOW, RatingSnapshot, RatingStore, RecentOutcome};
