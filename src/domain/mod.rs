//! Domain layer: the vehicle listing entity and the pure rules around it.
//!
//! Contains the typed identifier, the entity with its create and
//! partial-update payloads, the catalog filter, and contact link building.
//! Nothing here touches storage or HTTP.

pub mod contact;
pub mod filter;
pub mod vehicle;
pub mod vehicle_id;

pub use filter::CatalogFilter;
pub use vehicle::{FUEL_TYPES, NewVehicle, Source, Status, Vehicle, VehicleChanges};
pub use vehicle_id::VehicleId;
