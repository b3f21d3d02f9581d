pub use arena_rating::entrant::{DisplayName, Entrant};
pub use arena_rating::history::HistoryPoint;
pub use arena_rating::ledger::{Outcome, RatingEvent};
pub use arena_rating::standings::StandingRow;
pub use arena_rating::store::RatingSnapshot;
