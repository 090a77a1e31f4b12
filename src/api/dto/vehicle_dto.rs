//! Vehicle DTOs for create, update, and delete operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::VehicleId;

/// Response body for `POST /vehicles` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateVehicleResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Id assigned to the new listing.
    pub id: VehicleId,
}

/// Response body for `PUT /vehicles`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateVehicleResponse {
    /// Always `true` when the request was processed.
    pub success: bool,
    /// `false` when the listing does not exist or no field was supplied.
    pub updated: bool,
}

/// Response body for `DELETE /vehicles`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteVehicleResponse {
    /// Always `true` when the request was processed.
    pub success: bool,
    /// `false` when the listing was already gone.
    pub deleted: bool,
}

/// Query parameters for `DELETE /vehicles`.
///
/// `id` is kept as text so that a missing value and a malformed one can be
/// reported differently.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteVehicleParams {
    /// Id of the listing to delete.
    #[param(value_type = i64)]
    pub id: Option<String>,
}
