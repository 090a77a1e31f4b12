//! Public catalog DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Vehicle;

/// One listing as shown in the public catalog.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntryDto {
    /// The listing itself.
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// WhatsApp deep link for purchase enquiries.
    pub contact_url: Option<String>,
}
