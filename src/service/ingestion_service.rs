//! Marketplace ingestion: pulls listings from a source and upserts them by
//! their external scrape id.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{NewVehicle, Source, Status};
use crate::error::ListingError;
use crate::persistence::{UpsertOutcome, VehicleStore};

/// A listing observed on an external marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedListing {
    /// Marketplace-unique key used for dedup.
    pub scrape_id: String,
    /// Full listing payload used when the key has not been seen yet.
    pub listing: NewVehicle,
}

/// Common trait for all marketplace sources.
#[async_trait]
pub trait ListingSource: Send + Sync + fmt::Debug {
    /// Fetches the listings currently visible on the source.
    async fn fetch_listings(&self) -> anyhow::Result<Vec<ScrapedListing>>;

    /// Name of the source, for logs.
    fn source_name(&self) -> &'static str;
}

/// Stand-in for the sahibinden.com scraper.
///
/// Always returns the same single listing so the ingestion path can be
/// exercised end to end without any network access.
#[derive(Debug, Clone, Default)]
pub struct MockMarketplace {
    whatsapp_number: String,
}

impl MockMarketplace {
    /// Creates a mock source whose listings carry `whatsapp_number`.
    #[must_use]
    pub fn new(whatsapp_number: impl Into<String>) -> Self {
        Self {
            whatsapp_number: whatsapp_number.into(),
        }
    }
}

#[async_trait]
impl ListingSource for MockMarketplace {
    async fn fetch_listings(&self) -> anyhow::Result<Vec<ScrapedListing>> {
        Ok(vec![ScrapedListing {
            scrape_id: "sahibinden_test_12345".to_string(),
            listing: NewVehicle {
                title: "2019 Volkswagen Passat 1.6 TDI Comfortline".to_string(),
                price: 890_000,
                year: 2019,
                km: 78_000,
                fuel: "Dizel".to_string(),
                brand: "Volkswagen".to_string(),
                model: "Passat".to_string(),
                images: vec![
                    "https://images.unsplash.com/photo-1542362567-b07e54358753?w=800".to_string(),
                ],
                whatsapp: Some(self.whatsapp_number.clone()),
                source: Source::Sahibinden,
                status: Status::Active,
                scrape_id: None,
                description: Some("Sahibinden temiz araç".to_string()),
            },
        }])
    }

    fn source_name(&self) -> &'static str {
        "sahibinden-mock"
    }
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct IngestReport {
    /// Listings inserted because their scrape id was new.
    pub added: u32,
    /// Existing listings whose price and mileage were refreshed.
    pub updated: u32,
    /// Listings dropped because they failed validation.
    pub skipped: u32,
}

/// Runs a [`ListingSource`] into a [`VehicleStore`].
#[derive(Debug, Clone)]
pub struct IngestionService {
    store: Arc<dyn VehicleStore>,
    source: Arc<dyn ListingSource>,
}

impl IngestionService {
    /// Creates a new `IngestionService`.
    #[must_use]
    pub fn new(store: Arc<dyn VehicleStore>, source: Arc<dyn ListingSource>) -> Self {
        Self { store, source }
    }

    /// Fetches all listings from the source and upserts each one.
    ///
    /// New scrape ids are inserted in full; known ones only get their price
    /// and mileage refreshed. Invalid listings are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Ingestion`] if the source fails, or
    /// [`ListingError::Storage`] if an upsert fails. The run stops at the
    /// first storage failure; listings already written stay written.
    pub async fn run(&self) -> Result<IngestReport, ListingError> {
        let source = self.source.source_name();
        let listings = self
            .source
            .fetch_listings()
            .await
            .map_err(|e| ListingError::Ingestion(format!("{source}: {e:#}")))?;

        tracing::info!(source, count = listings.len(), "ingesting listings");

        let mut report = IngestReport::default();
        for ScrapedListing { scrape_id, listing } in listings {
            let listing = match listing.validated() {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!(source, %scrape_id, error = %e, "skipping invalid listing");
                    report.skipped = report.skipped.saturating_add(1);
                    continue;
                }
            };

            match self.store.upsert_by_scrape_id(&scrape_id, listing).await? {
                UpsertOutcome::Created(id) => {
                    tracing::debug!(source, %scrape_id, %id, "listing added");
                    report.added = report.added.saturating_add(1);
                }
                UpsertOutcome::Updated(id) => {
                    tracing::debug!(source, %scrape_id, %id, "listing refreshed");
                    report.updated = report.updated.saturating_add(1);
                }
            }
        }

        tracing::info!(
            source,
            added = report.added,
            updated = report.updated,
            skipped = report.skipped,
            "ingestion finished"
        );
        Ok(report)
    }
}
