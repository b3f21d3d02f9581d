use crate::entrant::EntrantId;
use crate::ledger::RatingEvent;

pub type Result<T> = std::result::Result<T, RatingError>;

/// Failure taxonomy for ledger-mutating operations. Query operations
/// never fail on valid input; they degrade to baseline/empty results.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("entrant {0} is not registered")]
    UnknownEntrant(EntrantId),
    /// Carries the original event so that callers may treat a repeated
    /// ingestion of the same debate as an idempotent success.
    #[error("debate {} has already been scored", existing.debate_id)]
    DuplicateEvent { existing: Box<RatingEvent> },
    #[error("no rating event with id {0}")]
    EventNotFound(u64),
    #[error("rating event {0} has already been reversed")]
    AlreadyReversed(u64),
    /// The target is itself a compensating event; undoing a correction
    /// means re-recording the debate, not reversing the reversal.
    #[error("rating event {0} is a reversal and cannot be reversed")]
    NotReversible(u64),
    /// Zero-sum or bounded-delta violation, or a store/ledger
    /// divergence. Indicates a bug or misconfiguration; never clamped.
    #[error("rating invariant violated: {0}")]
    InvariantViolation(String),
    #[error("ledger storage failure")]
    Storage(#[from] std::io::Error),
    #[error("ledger record could not be (de)serialized")]
    Serialization(#[from] serde_json::Error),
}
