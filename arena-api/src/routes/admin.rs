use super::ApiError;
use actix_web::{HttpResponse, web};
use arena_rating::Arena;

#[derive(serde::Deserialize)]
pub struct FormData {
    event_id: u64,
}

/// Administrative correction: appends a compensating event instead of
/// editing history.
#[tracing::instrument(
    name = "Reversing a rating event",
    skip(form, arena),
    fields(event_id = %form.event_id)
)]
pub async fn reverse_event(
    form: web::Form<FormData>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let event = arena.reverse_event(form.0.event_id)?;

    Ok(HttpResponse::Ok().json(event))
}

/// Administrative recovery: discards the projection and re-folds the
/// ledger. Ingestion is locked out for the duration.
#[tracing::instrument(name = "Rebuilding the rating store from the ledger", skip(arena))]
pub async fn rebuild_store(arena: web::Data<Arena>) -> Result<HttpResponse, ApiError> {
    arena.rebuild_from_ledger()?;

    Ok(HttpResponse::Ok().finish())
}
