//! Two-player Elo arithmetic: expected score, rounded rating delta.
//!
//! Everything here is pure; the single source of truth for the K-factor
//! and the baseline rating is [`RatingConfig`], read once at startup.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Maximum-magnitude scale of a single outcome's effect.
    pub k: f64,
    /// Rating assigned to every entrant at registration.
    pub baseline: i32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k: 32.,
            baseline: 1500,
        }
    }
}

impl RatingConfig {
    /// Upper bound on `|after - before|` for any single event.
    pub fn max_delta(&self) -> i32 {
        self.k.ceil() as i32
    }
}

/// Probability in (0,1) that `rating_self` beats `rating_opponent`,
/// under the logistic model with a 400-point scale.
pub fn expected_score(rating_self: i32, rating_opponent: i32) -> f64 {
    1. / (1. + 10f64.powf(f64::from(rating_opponent - rating_self) / 400.))
}

/// Rounded rating change for the `rating_self` side of one outcome.
///
/// `actual_score` is 1 for a win, 0 for a loss, 0.5 for a draw. The
/// opponent's delta must be taken as the exact negation of this value,
/// never recomputed from the opponent's perspective, so that the
/// zero-sum invariant holds structurally rather than up to rounding.
pub fn rating_delta(rating_self: i32, rating_opponent: i32, actual_score: f64, k: f64) -> i32 {
    (k * (actual_score - expected_score(rating_self, rating_opponent))).round() as i32
}

/// `rating_self` after one outcome against `rating_opponent`.
pub fn new_rating(rating_self: i32, rating_opponent: i32, actual_score: f64, k: f64) -> i32 {
    rating_self + rating_delta(rating_self, rating_opponent, actual_score, k)
}
