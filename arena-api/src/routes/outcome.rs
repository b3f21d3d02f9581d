use super::ApiError;
use crate::domain::Outcome;
use actix_web::{HttpResponse, web};
use arena_rating::{Arena, RatingError};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct FormData {
    debate_id: Uuid,
    entrant_a: String,
    entrant_b: String,
    outcome: Outcome,
}

/// The sole rating-mutating trigger: a finalized debate coming in from
/// the orchestration system. Replays of the same debate return the
/// original event unchanged, so delivery retries are harmless.
#[tracing::instrument(
    name = "Recording a finalized debate outcome",
    skip(form, arena),
    fields(
        debate_id = %form.debate_id,
        entrant_a = %form.entrant_a,
        entrant_b = %form.entrant_b
    )
)]
pub async fn record_outcome(
    form: web::Form<FormData>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let entrant_a = arena
        .entrant_by_slug(&form.0.entrant_a)
        .ok_or(ApiError::UnknownEntrant)?;
    let entrant_b = arena
        .entrant_by_slug(&form.0.entrant_b)
        .ok_or(ApiError::UnknownEntrant)?;
    if entrant_a.id == entrant_b.id {
        return Err(ApiError::ValidationError(
            "A debate needs two distinct entrants.".to_string(),
        ));
    }

    match arena.record_outcome(form.0.debate_id, entrant_a.id, entrant_b.id, form.0.outcome) {
        Ok(event) => Ok(HttpResponse::Ok().json(event)),
        Err(RatingError::DuplicateEvent { existing }) => {
            tracing::warn!("Debate {} was already scored; returning the original event", form.0.debate_id);
            Ok(HttpResponse::Ok().json(*existing))
        }
        Err(e) => Err(e.into()),
    }
}
