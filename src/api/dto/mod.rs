//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies reuse the domain payloads ([`crate::domain::NewVehicle`],
//! [`crate::domain::VehicleChanges`]); this module holds the response
//! envelopes and query parameter types that only exist on the wire.

pub mod catalog_dto;
pub mod scrape_dto;
pub mod vehicle_dto;

pub use catalog_dto::*;
pub use scrape_dto::*;
pub use vehicle_dto::*;
