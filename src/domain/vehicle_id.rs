//! Type-safe vehicle identifier.
//!
//! [`VehicleId`] is a newtype wrapper around the `BIGSERIAL` primary key so
//! that listing identifiers cannot be confused with prices, years, or
//! odometer readings, which are plain integers too.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a vehicle listing.
///
/// Assigned by the store at insert time and immutable thereafter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct VehicleId(i64);

impl VehicleId {
    /// Wraps a raw database id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw database id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
