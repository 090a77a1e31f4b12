//! OpenAPI document for every REST endpoint.

use utoipa::OpenApi;

use super::dto::{
    CatalogEntryDto, CreateVehicleResponse, DeleteVehicleResponse, ScrapeResponse,
    UpdateVehicleResponse,
};
use super::handlers::{catalog, scrape, system, vehicle};
use crate::domain::{NewVehicle, Source, Status, Vehicle, VehicleChanges, VehicleId};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`
/// when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "galeri-listings",
        description = "Dealership vehicle catalog, admin listing management, and marketplace ingestion."
    ),
    paths(
        vehicle::list_vehicles,
        vehicle::get_vehicle,
        vehicle::create_vehicle,
        vehicle::update_vehicle,
        vehicle::delete_vehicle,
        catalog::browse_catalog,
        scrape::run_scrape,
        system::health_handler,
        system::fuel_types_handler,
    ),
    components(schemas(
        Vehicle,
        VehicleId,
        NewVehicle,
        VehicleChanges,
        Source,
        Status,
        CatalogEntryDto,
        CreateVehicleResponse,
        UpdateVehicleResponse,
        DeleteVehicleResponse,
        ScrapeResponse,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Vehicles", description = "Listing management"),
        (name = "Catalog", description = "Public catalog"),
        (name = "Ingestion", description = "Marketplace ingestion"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
