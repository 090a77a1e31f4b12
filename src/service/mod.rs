//! Service layer: business logic orchestration.
//!
//! [`VehicleService`] validates listing requests and delegates to the
//! [`crate::persistence::VehicleStore`]; [`IngestionService`] feeds
//! marketplace listings into the same store.

pub mod ingestion_service;
pub mod vehicle_service;

pub use ingestion_service::{IngestReport, IngestionService, ListingSource, MockMarketplace};
pub use vehicle_service::VehicleService;
