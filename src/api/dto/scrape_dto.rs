//! Ingestion trigger DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::IngestReport;

/// Response body for `POST /scrape`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScrapeResponse {
    /// Always `true` when the run completed.
    pub success: bool,
    /// Human-readable summary of the run.
    pub message: String,
    /// Listings inserted.
    pub added: u32,
    /// Listings refreshed.
    pub updated: u32,
    /// Listings rejected by validation.
    pub skipped: u32,
}

impl From<IngestReport> for ScrapeResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            success: true,
            message: format!(
                "{} vehicles added, {} vehicles updated",
                report.added, report.updated
            ),
            added: report.added,
            updated: report.updated,
            skipped: report.skipped,
        }
    }
}
