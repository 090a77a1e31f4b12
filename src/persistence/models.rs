//! Row model for the `vehicles` table and the `images` column codec.
//!
//! `images` is stored as JSON text. Encoding and decoding happen only here;
//! everything above the persistence layer sees `Vec<String>`.

use chrono::{DateTime, Utc};

use crate::domain::{Vehicle, VehicleId};
use crate::error::ListingError;

/// Column list shared by every `SELECT` against `vehicles`.
pub const VEHICLE_COLUMNS: &str = "id, created_at, updated_at, title, price, year, km, fuel, \
     brand, model, images, whatsapp, source, status, scrape_id, description";

/// A raw row from the `vehicles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleRow {
    /// `BIGSERIAL` primary key.
    pub id: i64,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Listing headline.
    pub title: String,
    /// Asking price.
    pub price: i64,
    /// Model year.
    pub year: i32,
    /// Odometer reading.
    pub km: i64,
    /// Fuel type.
    pub fuel: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// JSON-encoded array of image URLs.
    pub images: String,
    /// Contact number.
    pub whatsapp: Option<String>,
    /// `"sahibinden"` or `"manuel"`.
    pub source: String,
    /// `"active"` or `"sold"`.
    pub status: String,
    /// External dedup key.
    pub scrape_id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = ListingError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VehicleId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            images: decode_images(&row.images)?,
            source: row.source.parse().map_err(corrupt_row(row.id))?,
            status: row.status.parse().map_err(corrupt_row(row.id))?,
            title: row.title,
            price: row.price,
            year: row.year,
            km: row.km,
            fuel: row.fuel,
            brand: row.brand,
            model: row.model,
            whatsapp: row.whatsapp,
            scrape_id: row.scrape_id,
            description: row.description,
        })
    }
}

/// Serializes an image list for the `images` column.
///
/// # Errors
///
/// Returns [`ListingError::Internal`] if serialization fails, which cannot
/// happen for a list of strings.
pub fn encode_images(images: &[String]) -> Result<String, ListingError> {
    serde_json::to_string(images)
        .map_err(|e| ListingError::Internal(format!("failed to encode images: {e}")))
}

/// Parses the `images` column back into a list.
///
/// A `NULL`-ish empty string decodes to an empty list.
///
/// # Errors
///
/// Returns [`ListingError::Storage`] if the column does not hold a JSON
/// array of strings.
pub fn decode_images(raw: &str) -> Result<Vec<String>, ListingError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| ListingError::Storage(format!("corrupt images column: {e}")))
}

/// Converts the rows of a `SELECT` into entities.
///
/// # Errors
///
/// Returns [`ListingError::Storage`] if any row fails to decode.
pub fn into_vehicles(rows: Vec<VehicleRow>) -> Result<Vec<Vehicle>, ListingError> {
    rows.into_iter().map(Vehicle::try_from).collect()
}

fn corrupt_row(id: i64) -> impl Fn(ListingError) -> ListingError {
    move |e| ListingError::Storage(format!("corrupt vehicle row {id}: {e}"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Source, Status};

    fn row() -> VehicleRow {
        let now = Utc::now();
        VehicleRow {
            id: 3,
            created_at: now,
            updated_at: now,
            title: "2019 VW Passat".to_string(),
            price: 890_000,
            year: 2019,
            km: 78_000,
            fuel: "Dizel".to_string(),
            brand: "Volkswagen".to_string(),
            model: "Passat".to_string(),
            images: r#"["https://x/1.jpg","https://x/2.jpg"]"#.to_string(),
            whatsapp: None,
            source: "sahibinden".to_string(),
            status: "sold".to_string(),
            scrape_id: Some("sahibinden_test_12345".to_string()),
            description: None,
        }
    }

    #[test]
    fn images_keep_their_order() {
        let images = vec![
            "https://x/b.jpg".to_string(),
            "https://x/a.jpg".to_string(),
            "https://x/c.jpg?w=800".to_string(),
        ];
        let Ok(encoded) = encode_images(&images) else {
            panic!("encoding failed");
        };
        let Ok(decoded) = decode_images(&encoded) else {
            panic!("decoding failed");
        };
        assert_eq!(decoded, images);
    }

    #[test]
    fn empty_list_encodes_as_json_array() {
        assert_eq!(encode_images(&[]).ok().as_deref(), Some("[]"));
        assert_eq!(decode_images("").ok(), Some(Vec::new()));
    }

    #[test]
    fn malformed_images_column_is_a_storage_error() {
        assert!(matches!(
            decode_images("not json"),
            Err(ListingError::Storage(_))
        ));
        assert!(decode_images("[1, 2]").is_err());
    }

    #[test]
    fn row_converts_to_vehicle() {
        let Ok(vehicle) = Vehicle::try_from(row()) else {
            panic!("conversion failed");
        };
        assert_eq!(vehicle.id, VehicleId::new(3));
        assert_eq!(vehicle.source, Source::Sahibinden);
        assert_eq!(vehicle.status, Status::Sold);
        assert_eq!(vehicle.images.len(), 2);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut bad = row();
        bad.status = "archived".to_string();
        assert!(matches!(
            Vehicle::try_from(bad),
            Err(ListingError::Storage(_))
        ));
    }
}
