//! Public catalog handler.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::CatalogEntryDto;
use crate::app_state::AppState;
use crate::domain::CatalogFilter;
use crate::error::{ErrorResponse, ListingError};

/// `GET /catalog`: Active listings for the public site.
///
/// # Errors
///
/// Returns [`ListingError::Validation`] on malformed filter values.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "Catalog",
    summary = "Browse active vehicles",
    description = "Returns active listings, newest first, narrowed by the optional text, price and year filters. Sold listings are never included.",
    params(CatalogFilter),
    responses(
        (status = 200, description = "Matching listings", body = Vec<CatalogEntryDto>),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
    )
)]
pub async fn browse_catalog(
    State(state): State<AppState>,
    query: Result<Query<CatalogFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ListingError> {
    let Query(filter) = query?;
    let service = &state.vehicle_service;
    let entries: Vec<CatalogEntryDto> = service
        .catalog(&filter)
        .await?
        .into_iter()
        .map(|vehicle| CatalogEntryDto {
            contact_url: service.contact_link(&vehicle),
            vehicle,
        })
        .collect();
    Ok(Json(entries))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/catalog", get(browse_catalog))
}
