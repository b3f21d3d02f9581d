use super::ApiError;
use crate::domain::{DisplayName, Entrant, HistoryPoint, RatingSnapshot};
use actix_web::{HttpResponse, web};
use arena_rating::Arena;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct SlugForm {
    slug: String,
}

#[derive(Serialize, Deserialize)]
pub struct EntrantStatus {
    pub entrant: Entrant,
    pub snapshot: RatingSnapshot,
}

#[tracing::instrument(
    name = "Requesting an entrant's current standing",
    skip(form, arena),
    fields(slug = %form.slug)
)]
pub async fn request_entrant(
    form: web::Form<SlugForm>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let entrant = arena
        .entrant_by_slug(&form.0.slug)
        .ok_or(ApiError::UnknownEntrant)?;
    let snapshot = arena.current(entrant.id);

    Ok(HttpResponse::Ok().json(EntrantStatus { entrant, snapshot }))
}

#[tracing::instrument(
    name = "Requesting an entrant's rating history",
    skip(form, arena),
    fields(slug = %form.slug)
)]
pub async fn request_history(
    form: web::Form<SlugForm>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let entrant = arena
        .entrant_by_slug(&form.0.slug)
        .ok_or(ApiError::UnknownEntrant)?;
    let series: Vec<HistoryPoint> = arena.series(entrant.id);

    Ok(HttpResponse::Ok().json(series))
}

#[derive(Deserialize)]
pub struct TrendForm {
    slug: String,
    window: usize,
}

#[derive(Serialize, Deserialize)]
pub struct TrendSummary {
    pub slug: String,
    pub window: usize,
    pub trend: i32,
}

#[tracing::instrument(
    name = "Requesting an entrant's rating trend",
    skip(form, arena),
    fields(slug = %form.slug, window = %form.window)
)]
pub async fn request_trend(
    form: web::Form<TrendForm>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let entrant = arena
        .entrant_by_slug(&form.0.slug)
        .ok_or(ApiError::UnknownEntrant)?;
    let trend = arena.trend(entrant.id, form.0.window);

    Ok(HttpResponse::Ok().json(TrendSummary {
        slug: form.0.slug,
        window: form.0.window,
        trend,
    }))
}

#[derive(Deserialize)]
pub struct RegisterForm {
    name: String,
    provider: String,
}

#[tracing::instrument(
    name = "Registering a new entrant",
    skip(form, arena),
    fields(name = %form.name, provider = %form.provider)
)]
pub async fn register_entrant(
    form: web::Form<RegisterForm>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let name = DisplayName::parse(form.0.name).map_err(ApiError::ValidationError)?;
    let entrant = arena.register_entrant(name, form.0.provider)?;

    Ok(HttpResponse::Ok().json(entrant))
}
