//! In-process vehicle store.
//!
//! [`MemoryVehicleStore`] keeps every listing in a `BTreeMap` behind a
//! single [`tokio::sync::RwLock`]. It honours the same contract as the
//! PostgreSQL store, including the `scrape_id` uniqueness constraint, and
//! is selected when persistence is disabled.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{UpsertOutcome, VehicleStore};
use crate::domain::vehicle::next_updated_at;
use crate::domain::{NewVehicle, Vehicle, VehicleChanges, VehicleId};
use crate::error::ListingError;

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<VehicleId, Vehicle>,
}

impl Inner {
    fn insert(&mut self, vehicle: NewVehicle) -> Result<VehicleId, ListingError> {
        if let Some(scrape_id) = vehicle.scrape_id.as_deref()
            && self.find_scrape_id(scrape_id).is_some()
        {
            return Err(ListingError::Storage(format!(
                "duplicate scrape_id: {scrape_id}"
            )));
        }

        self.last_id = self.last_id.saturating_add(1);
        let id = VehicleId::new(self.last_id);
        self.rows.insert(id, vehicle.into_vehicle(id, Utc::now()));
        Ok(id)
    }

    fn find_scrape_id(&self, scrape_id: &str) -> Option<VehicleId> {
        self.rows
            .values()
            .find(|v| v.scrape_id.as_deref() == Some(scrape_id))
            .map(|v| v.id)
    }

    /// Listings matching `keep`, newest first.
    fn newest_first(&self, keep: impl Fn(&Vehicle) -> bool) -> Vec<Vehicle> {
        let mut out: Vec<Vehicle> = self.rows.values().filter(|v| keep(v)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        out
    }
}

/// Vehicle store held entirely in memory.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct MemoryVehicleStore {
    inner: RwLock<Inner>,
}

impl MemoryVehicleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn list_all(&self) -> Result<Vec<Vehicle>, ListingError> {
        Ok(self.inner.read().await.newest_first(|_| true))
    }

    async fn list_active(&self) -> Result<Vec<Vehicle>, ListingError> {
        Ok(self.inner.read().await.newest_first(Vehicle::is_active))
    }

    async fn get_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, ListingError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<VehicleId, ListingError> {
        self.inner.write().await.insert(vehicle)
    }

    async fn update(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<bool, ListingError> {
        if changes.is_empty() {
            return Ok(false);
        }
        let mut inner = self.inner.write().await;
        let Some(vehicle) = inner.rows.get_mut(&id) else {
            return Ok(false);
        };
        changes.apply_to(vehicle);
        Ok(true)
    }

    async fn delete(&self, id: VehicleId) -> Result<bool, ListingError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn upsert_by_scrape_id(
        &self,
        scrape_id: &str,
        mut vehicle: NewVehicle,
    ) -> Result<UpsertOutcome, ListingError> {
        let mut inner = self.inner.write().await;

        if let Some(id) = inner.find_scrape_id(scrape_id) {
            if let Some(existing) = inner.rows.get_mut(&id) {
                existing.price = vehicle.price;
                existing.km = vehicle.km;
                existing.updated_at = next_updated_at(existing.updated_at);
            }
            return Ok(UpsertOutcome::Updated(id));
        }

        vehicle.scrape_id = Some(scrape_id.to_string());
        inner.insert(vehicle).map(UpsertOutcome::Created)
    }
}
