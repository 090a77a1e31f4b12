//! The vehicle listing entity and its create / partial-update payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::VehicleId;
use crate::error::ListingError;

/// Fuel vocabulary offered by the admin form.
///
/// The column itself is free text; this list only drives the UI.
pub const FUEL_TYPES: &[&str] = &["Benzin", "Dizel", "LPG Benzin", "Hybrid", "Elektrik"];

/// Oldest model year accepted by validation.
pub const MIN_YEAR: i32 = 1900;

/// Newest model year accepted by validation.
pub const MAX_YEAR: i32 = 2100;

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Ingested from the sahibinden.com marketplace.
    Sahibinden,
    /// Entered by hand through the admin panel.
    Manuel,
}

impl Source {
    /// Returns the storage / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sahibinden => "sahibinden",
            Self::Manuel => "manuel",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sahibinden" => Ok(Self::Sahibinden),
            "manuel" => Ok(Self::Manuel),
            other => Err(ListingError::Validation(format!(
                "unknown source: {other}"
            ))),
        }
    }
}

/// Sale status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Listed and visible in the public catalog.
    Active,
    /// Sold; hidden from the catalog, kept for the admin panel.
    Sold,
}

impl Status {
    /// Returns the storage / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "sold" => Ok(Self::Sold),
            other => Err(ListingError::Validation(format!(
                "unknown status: {other}"
            ))),
        }
    }
}

/// A stored vehicle listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    /// Store-assigned identifier.
    pub id: VehicleId,
    /// Insert timestamp (immutable).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last successful update.
    pub updated_at: DateTime<Utc>,
    /// Listing headline, e.g. `"2019 VW Passat"`.
    pub title: String,
    /// Asking price in whole lira.
    pub price: i64,
    /// Model year.
    pub year: i32,
    /// Odometer reading in kilometres.
    pub km: i64,
    /// Fuel type, see [`FUEL_TYPES`].
    pub fuel: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Contact phone number for this listing.
    pub whatsapp: Option<String>,
    /// Provenance tag.
    pub source: Source,
    /// Sale status.
    pub status: Status,
    /// External marketplace key used for ingestion dedup.
    pub scrape_id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

impl Vehicle {
    /// Returns `true` when the listing is visible in the public catalog.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// Fields required to create a listing.
///
/// `images` defaults to an empty list; the optional text fields default to
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewVehicle {
    /// Listing headline.
    pub title: String,
    /// Asking price in whole lira.
    pub price: i64,
    /// Model year.
    pub year: i32,
    /// Odometer reading in kilometres.
    pub km: i64,
    /// Fuel type.
    pub fuel: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Contact phone number.
    #[serde(default)]
    pub whatsapp: Option<String>,
    /// Provenance tag.
    pub source: Source,
    /// Initial sale status.
    pub status: Status,
    /// External marketplace key.
    #[serde(default)]
    pub scrape_id: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewVehicle {
    /// Checks the field-level constraints and normalizes blank optional
    /// text to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Validation`] naming the first offending field.
    pub fn validated(mut self) -> Result<Self, ListingError> {
        require_text("title", &self.title)?;
        require_text("fuel", &self.fuel)?;
        require_text("brand", &self.brand)?;
        require_text("model", &self.model)?;
        require_non_negative("price", self.price)?;
        require_non_negative("km", self.km)?;
        require_year(self.year)?;
        require_images(&self.images)?;

        self.whatsapp = blank_to_none(self.whatsapp);
        self.scrape_id = blank_to_none(self.scrape_id);
        self.description = blank_to_none(self.description);
        Ok(self)
    }

    /// Materializes the stored entity for a freshly assigned id.
    #[must_use]
    pub fn into_vehicle(self, id: VehicleId, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id,
            created_at: now,
            updated_at: now,
            title: self.title,
            price: self.price,
            year: self.year,
            km: self.km,
            fuel: self.fuel,
            brand: self.brand,
            model: self.model,
            images: self.images,
            whatsapp: self.whatsapp,
            source: self.source,
            status: self.status,
            scrape_id: self.scrape_id,
            description: self.description,
        }
    }
}

/// Sparse set of field changes for a partial update.
///
/// Absent fields keep their stored value. For the nullable fields
/// (`whatsapp`, `description`) an explicit JSON `null` clears the value,
/// which is why they are doubly optional. `source`, `scrape_id` and the
/// timestamps are not updatable and are ignored if a client sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct VehicleChanges {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New price.
    #[serde(default)]
    pub price: Option<i64>,
    /// New model year.
    #[serde(default)]
    pub year: Option<i32>,
    /// New odometer reading.
    #[serde(default)]
    pub km: Option<i64>,
    /// New fuel type.
    #[serde(default)]
    pub fuel: Option<String>,
    /// New manufacturer.
    #[serde(default)]
    pub brand: Option<String>,
    /// New model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Replacement image list.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// New contact number; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub whatsapp: Option<Option<String>>,
    /// New sale status.
    #[serde(default)]
    pub status: Option<Status>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl VehicleChanges {
    /// A change set that only flips the sale status.
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A change set that only refreshes the volatile marketplace fields.
    #[must_use]
    pub fn price_and_km(price: i64, km: i64) -> Self {
        Self {
            price: Some(price),
            km: Some(km),
            ..Self::default()
        }
    }

    /// Returns `true` when no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks the constraints of every supplied field and normalizes blank
    /// nullable text to an explicit clear.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Validation`] naming the first offending field.
    pub fn validated(mut self) -> Result<Self, ListingError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(fuel) = &self.fuel {
            require_text("fuel", fuel)?;
        }
        if let Some(brand) = &self.brand {
            require_text("brand", brand)?;
        }
        if let Some(model) = &self.model {
            require_text("model", model)?;
        }
        if let Some(price) = self.price {
            require_non_negative("price", price)?;
        }
        if let Some(km) = self.km {
            require_non_negative("km", km)?;
        }
        if let Some(year) = self.year {
            require_year(year)?;
        }
        if let Some(images) = &self.images {
            require_images(images)?;
        }

        self.whatsapp = self.whatsapp.map(blank_to_none);
        self.description = self.description.map(blank_to_none);
        Ok(self)
    }

    /// Applies the supplied fields to `vehicle`, leaving the rest untouched,
    /// and advances `updated_at`.
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(title) = &self.title {
            vehicle.title.clone_from(title);
        }
        if let Some(price) = self.price {
            vehicle.price = price;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(km) = self.km {
            vehicle.km = km;
        }
        if let Some(fuel) = &self.fuel {
            vehicle.fuel.clone_from(fuel);
        }
        if let Some(brand) = &self.brand {
            vehicle.brand.clone_from(brand);
        }
        if let Some(model) = &self.model {
            vehicle.model.clone_from(model);
        }
        if let Some(images) = &self.images {
            vehicle.images.clone_from(images);
        }
        if let Some(whatsapp) = &self.whatsapp {
            vehicle.whatsapp.clone_from(whatsapp);
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
        if let Some(description) = &self.description {
            vehicle.description.clone_from(description);
        }
        vehicle.updated_at = next_updated_at(vehicle.updated_at);
    }
}

/// Returns a modification timestamp strictly after `previous`.
///
/// Uses the wall clock unless it has not moved past `previous` at
/// microsecond resolution (the precision of `TIMESTAMPTZ`).
#[must_use]
pub fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

/// Marks a field as present, so that an explicit `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_text(field: &str, value: &str) -> Result<(), ListingError> {
    if value.trim().is_empty() {
        return Err(ListingError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i64) -> Result<(), ListingError> {
    if value < 0 {
        return Err(ListingError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn require_year(year: i32) -> Result<(), ListingError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ListingError::Validation(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    Ok(())
}

fn require_images(images: &[String]) -> Result<(), ListingError> {
    if images.iter().any(|url| url.trim().is_empty()) {
        return Err(ListingError::Validation(
            "images must not contain blank URLs".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    /// The Passat listing used throughout the test suite.
    pub(crate) fn passat() -> NewVehicle {
        NewVehicle {
            title: "2019 VW Passat".to_string(),
            price: 890_000,
            year: 2019,
            km: 78_000,
            fuel: "Dizel".to_string(),
            brand: "Volkswagen".to_string(),
            model: "Passat".to_string(),
            images: vec!["https://x/1.jpg".to_string()],
            whatsapp: None,
            source: Source::Manuel,
            status: Status::Active,
            scrape_id: None,
            description: None,
        }
    }

    #[test]
    fn new_vehicle_defaults_images_to_empty() {
        let body = serde_json::json!({
            "title": "2015 Fiat Egea",
            "price": 450000,
            "year": 2015,
            "km": 120000,
            "fuel": "Benzin",
            "brand": "Fiat",
            "model": "Egea",
            "source": "manuel",
            "status": "active"
        });
        let Ok(vehicle) = serde_json::from_value::<NewVehicle>(body) else {
            panic!("valid body rejected");
        };
        assert!(vehicle.images.is_empty());
        assert_eq!(vehicle.whatsapp, None);
    }

    #[test]
    fn new_vehicle_rejects_non_numeric_price() {
        let body = serde_json::json!({
            "title": "x", "price": "cheap", "year": 2015, "km": 1,
            "fuel": "Benzin", "brand": "Fiat", "model": "Egea",
            "source": "manuel", "status": "active"
        });
        let Err(err) = serde_json::from_value::<NewVehicle>(body) else {
            panic!("expected a decoding error");
        };
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn new_vehicle_reports_missing_field() {
        let body = serde_json::json!({ "title": "x" });
        let Err(err) = serde_json::from_value::<NewVehicle>(body) else {
            panic!("expected a decoding error");
        };
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn validation_rejects_negative_price_and_km() {
        let mut v = passat();
        v.price = -1;
        assert!(matches!(v.validated(), Err(ListingError::Validation(_))));

        let mut v = passat();
        v.km = -5;
        assert!(matches!(v.validated(), Err(ListingError::Validation(_))));
    }

    #[test]
    fn validation_rejects_blank_title_and_out_of_range_year() {
        let mut v = passat();
        v.title = "   ".to_string();
        assert!(v.validated().is_err());

        let mut v = passat();
        v.year = 1800;
        assert!(v.validated().is_err());
    }

    #[test]
    fn validation_normalizes_blank_optionals() {
        let mut v = passat();
        v.whatsapp = Some(String::new());
        v.description = Some("  ".to_string());
        let Ok(v) = v.validated() else {
            panic!("valid vehicle rejected");
        };
        assert_eq!(v.whatsapp, None);
        assert_eq!(v.description, None);
    }

    #[test]
    fn changes_distinguish_absent_from_null() {
        let Ok(changes) =
            serde_json::from_value::<VehicleChanges>(serde_json::json!({ "description": null }))
        else {
            panic!("valid changes rejected");
        };
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.whatsapp, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn changes_ignore_immutable_fields() {
        let Ok(changes) = serde_json::from_value::<VehicleChanges>(serde_json::json!({
            "source": "sahibinden",
            "created_at": "2020-01-01T00:00:00Z"
        })) else {
            panic!("unknown fields should be ignored");
        };
        assert!(changes.is_empty());
    }

    #[test]
    fn apply_touches_only_supplied_fields() {
        let created = Utc::now();
        let mut vehicle = passat().into_vehicle(VehicleId::new(1), created);
        let before = vehicle.clone();

        VehicleChanges::status(Status::Sold).apply_to(&mut vehicle);

        assert_eq!(vehicle.status, Status::Sold);
        assert!(vehicle.updated_at > before.updated_at);
        let mut expected = before;
        expected.status = Status::Sold;
        expected.updated_at = vehicle.updated_at;
        assert_eq!(vehicle, expected);
    }

    #[test]
    fn next_updated_at_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_updated_at(future) > future);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [Status::Active, Status::Sold] {
            let Ok(parsed) = status.as_str().parse::<Status>() else {
                panic!("status did not parse");
            };
            assert_eq!(parsed, status);
        }
        assert!("archived".parse::<Status>().is_err());
        assert!("manuel".parse::<Source>().is_ok());
    }
}
