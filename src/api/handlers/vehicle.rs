//! Vehicle CRUD handlers: list, get, create, update, delete.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::dto::{
    CreateVehicleResponse, DeleteVehicleParams, DeleteVehicleResponse, UpdateVehicleResponse,
};
use crate::app_state::AppState;
use crate::domain::{NewVehicle, Vehicle, VehicleChanges, VehicleId};
use crate::error::{ErrorResponse, ListingError};

/// `GET /vehicles`: List every listing, newest first.
///
/// # Errors
///
/// Returns [`ListingError::Storage`] if the store is unavailable.
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "Vehicles",
    summary = "List all vehicles",
    description = "Returns every listing regardless of status, newest first. Used by the admin panel.",
    responses(
        (status = 200, description = "All listings", body = Vec<Vehicle>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ListingError> {
    let vehicles = state.vehicle_service.list_all().await?;
    Ok(Json(vehicles))
}

/// `GET /vehicles/{id}`: Get a single listing.
///
/// # Errors
///
/// Returns [`ListingError::NotFound`] if the listing does not exist.
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "Vehicles",
    summary = "Get a vehicle",
    params(
        ("id" = i64, Path, description = "Vehicle id"),
    ),
    responses(
        (status = 200, description = "The listing", body = Vehicle),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ListingError> {
    let Path(id) = path?;
    let vehicle = state.vehicle_service.get(VehicleId::new(id)).await?;
    Ok(Json(vehicle))
}

/// `POST /vehicles`: Create a listing.
///
/// # Errors
///
/// Returns [`ListingError::Validation`] on a missing or mistyped field.
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "Vehicles",
    summary = "Create a vehicle",
    description = "Creates a listing. `images` defaults to an empty list; `whatsapp`, `scrape_id` and `description` are optional.",
    request_body = NewVehicle,
    responses(
        (status = 201, description = "Listing created", body = CreateVehicleResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<NewVehicle>, JsonRejection>,
) -> Result<impl IntoResponse, ListingError> {
    let Json(vehicle) = payload?;
    let id = state.vehicle_service.create(vehicle).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateVehicleResponse { success: true, id }),
    ))
}

/// `PUT /vehicles`: Partially update a listing.
///
/// The body carries the `id` next to any subset of the mutable fields.
///
/// # Errors
///
/// Returns [`ListingError::MissingParameter`] without an `id`, or
/// [`ListingError::Validation`] on a mistyped field.
#[utoipa::path(
    put,
    path = "/vehicles",
    tag = "Vehicles",
    summary = "Update a vehicle",
    description = "Changes only the supplied fields. Send `{\"id\": 1, \"status\": \"sold\"}` to toggle the sale status alone.",
    request_body = VehicleChanges,
    responses(
        (status = 200, description = "Update processed", body = UpdateVehicleResponse),
        (status = 400, description = "Missing id or invalid field", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ListingError> {
    let Json(body) = payload?;
    let (id, changes) = split_update_body(body)?;
    let updated = state.vehicle_service.update(id, changes).await?;
    Ok(Json(UpdateVehicleResponse {
        success: true,
        updated,
    }))
}

/// `DELETE /vehicles?id=<id>`: Delete a listing.
///
/// Deleting a listing that does not exist succeeds with `deleted: false`.
///
/// # Errors
///
/// Returns [`ListingError::MissingParameter`] without an `id`.
#[utoipa::path(
    delete,
    path = "/vehicles",
    tag = "Vehicles",
    summary = "Delete a vehicle",
    params(DeleteVehicleParams),
    responses(
        (status = 200, description = "Delete processed", body = DeleteVehicleResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    query: Result<Query<DeleteVehicleParams>, QueryRejection>,
) -> Result<impl IntoResponse, ListingError> {
    let Query(params) = query?;
    let raw = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ListingError::MissingParameter("id".to_string()))?;
    let id = parse_id(&raw)?;
    let deleted = state.vehicle_service.delete(id).await?;
    Ok(Json(DeleteVehicleResponse {
        success: true,
        deleted,
    }))
}

/// Vehicle management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/vehicles",
            get(list_vehicles)
                .post(create_vehicle)
                .put(update_vehicle)
                .delete(delete_vehicle),
        )
        .route("/vehicles/{id}", get(get_vehicle))
}

// ── Body Parsing Helpers ────────────────────────────────────────────────

/// Splits a `PUT /vehicles` body into the target id and the change set.
fn split_update_body(body: Value) -> Result<(VehicleId, VehicleChanges), ListingError> {
    let Value::Object(mut fields) = body else {
        return Err(ListingError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    };

    let id = match fields.remove("id") {
        None | Some(Value::Null) => {
            return Err(ListingError::MissingParameter("id".to_string()));
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .map(VehicleId::new)
            .ok_or_else(|| ListingError::Validation(format!("invalid id: {n}")))?,
        Some(Value::String(s)) => parse_id(&s)?,
        Some(other) => {
            return Err(ListingError::Validation(format!("invalid id: {other}")));
        }
    };

    let changes = serde_json::from_value::<VehicleChanges>(Value::Object(fields))
        .map_err(|e| ListingError::Validation(e.to_string()))?;

    Ok((id, changes))
}

fn parse_id(raw: &str) -> Result<VehicleId, ListingError> {
    raw.trim()
        .parse::<i64>()
        .map(VehicleId::new)
        .map_err(|_| ListingError::Validation(format!("invalid id: {raw}")))
}
