//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ListingConfig;
use crate::persistence::VehicleStore;
use crate::service::{IngestionService, ListingSource, MockMarketplace, VehicleService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Listing management and catalog queries.
    pub vehicle_service: Arc<VehicleService>,
    /// Marketplace ingestion.
    pub ingestion_service: Arc<IngestionService>,
}

impl AppState {
    /// Wires both services over one shared store.
    #[must_use]
    pub fn new(
        store: Arc<dyn VehicleStore>,
        source: Arc<dyn ListingSource>,
        whatsapp_number: &str,
    ) -> Self {
        Self {
            vehicle_service: Arc::new(VehicleService::new(Arc::clone(&store), whatsapp_number)),
            ingestion_service: Arc::new(IngestionService::new(store, source)),
        }
    }

    /// Builds the state used by the server: the given store and the mock
    /// marketplace carrying the configured dealership number.
    #[must_use]
    pub fn from_config(store: Arc<dyn VehicleStore>, config: &ListingConfig) -> Self {
        let source = Arc::new(MockMarketplace::new(config.whatsapp_number.clone()));
        Self::new(store, source, &config.whatsapp_number)
    }
}
