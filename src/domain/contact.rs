//! WhatsApp contact links for catalog listings.

use super::Vehicle;

const WHATSAPP_BASE: &str = "https://wa.me";

/// Builds the `wa.me` deep link shown next to an active listing.
///
/// Prefers the listing's own number and falls back to `default_number`.
/// Returns `None` for sold listings or when no usable number is known.
#[must_use]
pub fn whatsapp_link(vehicle: &Vehicle, default_number: &str) -> Option<String> {
    if !vehicle.is_active() {
        return None;
    }

    let digits = vehicle
        .whatsapp
        .as_deref()
        .map(digits_only)
        .filter(|d| !d.is_empty())
        .or_else(|| Some(digits_only(default_number)).filter(|d| !d.is_empty()))?;

    let message = format!(
        "Merhaba, {} hakkında bilgi almak istiyorum.",
        vehicle.title
    );
    Some(format!(
        "{WHATSAPP_BASE}/{digits}?text={}",
        urlencoding::encode(&message)
    ))
}

fn digits_only(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}
