mod admin;
mod entrant;
mod health_check;
mod outcome;
mod standings;
mod versus;

pub use admin::{rebuild_store, reverse_event};
pub use entrant::{
    EntrantStatus, TrendSummary, register_entrant, request_entrant, request_history, request_trend,
};
pub use health_check::health_check;
pub use outcome::record_outcome;
pub use standings::request_standings;
pub use versus::{VersusSummary, request_versus};

use actix_web::ResponseError;
use actix_web::http::StatusCode;
use arena_rating::RatingError;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error("no entrant matches the requested identifier")]
    UnknownEntrant,
    #[error("no rating event matches the requested id")]
    EventNotFound,
    #[error("the requested event has already been reversed")]
    AlreadyReversed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownEntrant | ApiError::EventNotFound => StatusCode::NOT_FOUND,
            ApiError::AlreadyReversed => StatusCode::CONFLICT,
            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// `DuplicateEvent` is deliberately absent: the ingestion route treats
// it as idempotent success and must intercept it before this runs.
impl From<RatingError> for ApiError {
    fn from(e: RatingError) -> Self {
        match e {
            RatingError::UnknownEntrant(_) => ApiError::UnknownEntrant,
            RatingError::EventNotFound(_) => ApiError::EventNotFound,
            RatingError::AlreadyReversed(_) => ApiError::AlreadyReversed,
            RatingError::NotReversible(id) => ApiError::ValidationError(format!(
                "Event {} is a reversal; re-record the debate instead of reversing it.",
                id
            )),
            other => ApiError::UnexpectedError(other.into()),
        }
    }
}
