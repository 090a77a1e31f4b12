//! Vehicle service: validates requests and delegates to the store.

use std::sync::Arc;

use crate::domain::contact::whatsapp_link;
use crate::domain::{CatalogFilter, NewVehicle, Vehicle, VehicleChanges, VehicleId};
use crate::error::ListingError;
use crate::persistence::VehicleStore;

/// Orchestration layer for listing management.
///
/// Stateless coordinator over a shared [`VehicleStore`]. Every mutation
/// validates its input first, then calls the store, then logs the result.
#[derive(Debug, Clone)]
pub struct VehicleService {
    store: Arc<dyn VehicleStore>,
    whatsapp_number: String,
}

impl VehicleService {
    /// Creates a new `VehicleService`.
    ///
    /// `whatsapp_number` is the dealership fallback used for contact links.
    #[must_use]
    pub fn new(store: Arc<dyn VehicleStore>, whatsapp_number: impl Into<String>) -> Self {
        Self {
            store,
            whatsapp_number: whatsapp_number.into(),
        }
    }

    /// All listings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    pub async fn list_all(&self) -> Result<Vec<Vehicle>, ListingError> {
        self.store.list_all().await
    }

    /// Active listings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    pub async fn list_active(&self) -> Result<Vec<Vehicle>, ListingError> {
        self.store.list_active().await
    }

    /// Active listings that satisfy `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the store is unavailable.
    pub async fn catalog(&self, filter: &CatalogFilter) -> Result<Vec<Vehicle>, ListingError> {
        let active = self.list_active().await?;
        Ok(filter.apply(active))
    }

    /// WhatsApp link for a catalog listing, if one can be built.
    #[must_use]
    pub fn contact_link(&self, vehicle: &Vehicle) -> Option<String> {
        whatsapp_link(vehicle, &self.whatsapp_number)
    }

    /// Fetches a single listing.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::NotFound`] if no listing has `id`, or
    /// [`ListingError::Storage`] if the store is unavailable.
    pub async fn get(&self, id: VehicleId) -> Result<Vehicle, ListingError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ListingError::NotFound(id))
    }

    /// Validates and inserts a new listing.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Validation`] for bad fields or
    /// [`ListingError::Storage`] if the insert fails.
    pub async fn create(&self, vehicle: NewVehicle) -> Result<VehicleId, ListingError> {
        let vehicle = vehicle.validated()?;
        let source = vehicle.source;
        let id = self.store.create(vehicle).await?;
        tracing::info!(%id, %source, "vehicle created");
        Ok(id)
    }

    /// Validates and applies a partial update.
    ///
    /// Returns `false` when nothing was supplied or the listing is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Validation`] for bad fields or
    /// [`ListingError::Storage`] if the update fails.
    pub async fn update(
        &self,
        id: VehicleId,
        changes: VehicleChanges,
    ) -> Result<bool, ListingError> {
        let changes = changes.validated()?;
        let updated = self.store.update(id, &changes).await?;
        if updated {
            tracing::info!(%id, status = ?changes.status, "vehicle updated");
        } else {
            tracing::debug!(%id, empty = changes.is_empty(), "vehicle update matched nothing");
        }
        Ok(updated)
    }

    /// Deletes a listing. Deleting a missing listing returns `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Storage`] if the delete fails.
    pub async fn delete(&self, id: VehicleId) -> Result<bool, ListingError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            tracing::info!(%id, "vehicle deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::domain::vehicle::tests::passat;
    use crate::persistence::MemoryVehicleStore;

    fn make_service() -> VehicleService {
        VehicleService::new(Arc::new(MemoryVehicleStore::new()), "905551112233")
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields_before_storing() {
        let service = make_service();
        let mut vehicle = passat();
        vehicle.km = -1;

        let result = service.create(vehicle).await;
        assert!(matches!(result, Err(ListingError::Validation(_))));

        let Ok(all) = service.list_all().await else {
            panic!("list failed");
        };
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let service = make_service();
        let result = service.get(VehicleId::new(404)).await;
        assert!(matches!(result, Err(ListingError::NotFound(id)) if id.get() == 404));
    }

    #[tokio::test]
    async fn update_validates_supplied_fields() {
        let service = make_service();
        let Ok(id) = service.create(passat()).await else {
            panic!("create failed");
        };
        let changes = VehicleChanges {
            price: Some(-10),
            ..VehicleChanges::default()
        };
        assert!(matches!(
            service.update(id, changes).await,
            Err(ListingError::Validation(_))
        ));
        let Ok(vehicle) = service.get(id).await else {
            panic!("vehicle missing");
        };
        assert_eq!(vehicle.price, 890_000);
    }

    #[tokio::test]
    async fn catalog_hides_sold_and_applies_filter() {
        let service = make_service();
        let Ok(passat_id) = service.create(passat()).await else {
            panic!("create failed");
        };
        let mut egea = passat();
        egea.title = "2015 Fiat Egea".to_string();
        egea.brand = "Fiat".to_string();
        egea.price = 450_000;
        let Ok(egea_id) = service.create(egea).await else {
            panic!("create failed");
        };

        let Ok(everything) = service.catalog(&CatalogFilter::default()).await else {
            panic!("catalog failed");
        };
        assert_eq!(everything.len(), 2);

        let _ = service.update(egea_id, VehicleChanges::status(Status::Sold)).await;
        let filter = CatalogFilter {
            price_max: Some(900_000),
            ..CatalogFilter::default()
        };
        let Ok(listed) = service.catalog(&filter).await else {
            panic!("catalog failed");
        };
        let ids: Vec<VehicleId> = listed.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![passat_id]);
    }

    #[tokio::test]
    async fn contact_link_uses_dealership_fallback() {
        let service = make_service();
        let Ok(id) = service.create(passat()).await else {
            panic!("create failed");
        };
        let Ok(vehicle) = service.get(id).await else {
            panic!("vehicle missing");
        };
        let link = service.contact_link(&vehicle);
        assert!(link.is_some_and(|l| l.starts_with("https://wa.me/905551112233")));
    }
}
