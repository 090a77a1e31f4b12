//! Catalog filter applied to the active listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};
use utoipa::IntoParams;

use super::Vehicle;

/// Query parameters accepted by the public catalog.
///
/// Every bound is optional and inclusive; an empty filter matches all
/// listings. Empty values (`?price_min=`), as sent by a plain HTML form,
/// count as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogFilter {
    /// Case-insensitive text matched against brand or title.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    /// Minimum price.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub price_min: Option<i64>,
    /// Maximum price.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub price_max: Option<i64>,
    /// Minimum model year.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year_min: Option<i32>,
}

impl CatalogFilter {
    /// Returns `true` if `vehicle` satisfies every supplied criterion.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(needle) = self.needle() {
            let brand = vehicle.brand.to_lowercase();
            let title = vehicle.title.to_lowercase();
            if !brand.contains(&needle) && !title.contains(&needle) {
                return false;
            }
        }
        if self.price_min.is_some_and(|min| vehicle.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| vehicle.price > max) {
            return false;
        }
        if self.year_min.is_some_and(|min| vehicle.year < min) {
            return false;
        }
        true
    }

    /// Keeps the matching vehicles, preserving their order.
    #[must_use]
    pub fn apply(&self, vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
        vehicles.into_iter().filter(|v| self.matches(v)).collect()
    }

    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
