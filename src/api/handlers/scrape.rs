//! Marketplace ingestion trigger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ScrapeResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ListingError};

/// `POST /scrape`: Pull listings from the marketplace source.
///
/// `GET` is accepted too, for schedulers that can only issue plain GETs.
///
/// # Errors
///
/// Returns [`ListingError::Ingestion`] if the source fails, or
/// [`ListingError::Storage`] if an upsert fails.
#[utoipa::path(
    method(post, get),
    path = "/scrape",
    tag = "Ingestion",
    summary = "Run marketplace ingestion",
    description = "Upserts every listing from the configured source by scrape id. New listings are inserted in full; known ones only get their price and mileage refreshed.",
    responses(
        (status = 200, description = "Ingestion finished", body = ScrapeResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
        (status = 502, description = "Source failure", body = ErrorResponse),
    )
)]
pub async fn run_scrape(State(state): State<AppState>) -> Result<impl IntoResponse, ListingError> {
    let report = state.ingestion_service.run().await?;
    Ok(Json(ScrapeResponse::from(report)))
}

/// Ingestion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/scrape", get(run_scrape).post(run_scrape))
}
