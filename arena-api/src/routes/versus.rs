use super::ApiError;
use actix_web::{HttpResponse, web};
use arena_rating::Arena;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct FormData {
    entrant: String,
    opponent: String,
}

#[derive(Serialize, Deserialize)]
pub struct VersusSummary {
    pub entrant: String,
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
}

#[tracing::instrument(
    name = "Requesting a head-to-head record",
    skip(form, arena),
    fields(entrant = %form.entrant, opponent = %form.opponent)
)]
pub async fn request_versus(
    form: web::Form<FormData>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let entrant = arena
        .entrant_by_slug(&form.0.entrant)
        .ok_or(ApiError::UnknownEntrant)?;
    let opponent = arena
        .entrant_by_slug(&form.0.opponent)
        .ok_or(ApiError::UnknownEntrant)?;
    let record = arena.head_to_head(entrant.id, opponent.id);

    Ok(HttpResponse::Ok().json(VersusSummary {
        entrant: entrant.slug,
        opponent: opponent.slug,
        wins: record.wins,
        losses: record.losses,
        draws: record.draws,
        win_rate: record.win_rate(),
    }))
}
