//! Persistence layer: the `vehicles` table and its in-memory stand-in.
//!
//! [`VehicleStore`] is the storage contract every handler goes through.
//! [`postgres::PostgresVehicleStore`] backs it with `sqlx::PgPool`;
//! [`memory::MemoryVehicleStore`] keeps rows in process for local runs
//! with persistence disabled and for tests.

pub mod memory;
pub mod models;
pub mod postgres;
#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod store_contract;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{NewVehicle, Vehicle, VehicleChanges, VehicleId};
use crate::error::ListingError;

pub use memory::MemoryVehicleStore;
pub use postgres::PostgresVehicleStore;

/// Result of [`VehicleStore::upsert_by_scrape_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No listing carried the scrape id; a new row was inserted.
    Created(VehicleId),
    /// An existing listing had its price and mileage refreshed.
    Updated(VehicleId),
}

/// Durable storage of vehicle listings.
///
/// Missing ids are never errors: lookups return `None` and mutations
/// return `false`. Every `Err` is a [`ListingError::Storage`].
#[async_trait]
pub trait VehicleStore: Send + Sync + fmt::Debug {
    /// All listings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn list_all(&self) -> Result<Vec<Vehicle>, ListingError>;

    /// Active listings only, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn list_active(&self) -> Result<Vec<Vehicle>, ListingError>;

    /// Looks up a single listing.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn get_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, ListingError>;

    /// Inserts a listing and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] on connectivity failure or a
    /// constraint violation such as a duplicate `scrape_id`.
    async fn create(&self, vehicle: NewVehicle) -> Result<VehicleId, ListingError>;

    /// Applies a partial update. Returns `false` if `changes` is empty or
    /// no listing has `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn update(&self, id: VehicleId, changes: &VehicleChanges)
    -> Result<bool, ListingError>;

    /// Removes a listing. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn delete(&self, id: VehicleId) -> Result<bool, ListingError>;

    /// Inserts `vehicle` under `scrape_id`, or, when a listing with that
    /// scrape id already exists, refreshes only its `price` and `km`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    async fn upsert_by_scrape_id(
        &self,
        scrape_id: &str,
        vehicle: NewVehicle,
    ) -> Result<UpsertOutcome, ListingError>;
}
