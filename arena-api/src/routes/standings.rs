use super::ApiError;
use crate::domain::StandingRow;
use actix_web::{HttpResponse, web};
use arena_rating::Arena;

#[derive(serde::Deserialize)]
pub struct FormData {
    many: usize,
    #[serde(default)]
    start: usize,
}

#[tracing::instrument(
    name = "Requesting ranked standings",
    skip(form, arena),
    fields(
        many = %form.many,
        start = %form.start
    )
)]
pub async fn request_standings(
    form: web::Form<FormData>,
    arena: web::Data<Arena>,
) -> Result<HttpResponse, ApiError> {
    let rows = standings_page(form.0.many, form.0.start, &arena)
        .await
        .map_err(ApiError::ValidationError)?;

    Ok(HttpResponse::Ok().json(rows))
}

#[tracing::instrument(name = "Obtaining the standings page from the arena", skip(arena))]
pub async fn standings_page(
    many: usize,
    start: usize,
    arena: &Arena,
) -> Result<Vec<StandingRow>, String> {
    if many > 200 {
        return Err(format!(
            "Requested {} standings rows. Please limit your requests to 200.",
            many
        ));
    }
    let rows = arena.standings();
    if start > rows.len() {
        return Err(format!("Start index {}/{} out of bounds", start, rows.len()));
    }
    let end = rows.len().min(start + many);
    Ok(rows[start..end].to_vec())
}
