//! User-facing feedback and toast text.

use nearby_core::{Coordinates, ResolutionOutcome};

pub const DEFAULT_GUIDANCE: &str =
    "Enter an address or capture your location to find nearby listings.";
pub const ADDRESS_ENTERED: &str = "Address entered. Press search to find nearby listings.";
pub const LOCATING: &str = "Getting your location…";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this device.";
pub const POSTAL_PROMPT: &str = "Enter a postal code to search.";
pub const POSTAL_ENDPOINT_MISSING: &str = "Geocoding endpoint is not available.";
pub const POSTAL_QUERYING: &str = "Looking up postal code…";
pub const POSTAL_RESOLVED: &str = "Coordinates filled from postal code.";
pub const POSTAL_UNAVAILABLE: &str = "Could not look up the postal code right now.";
pub const SEARCHING_NEARBY: &str = "Searching for listings near your location…";
pub const SEARCH_UNAVAILABLE: &str = "Search is unavailable right now. Please try again.";

/// Success text after a device fix, with coordinates shortened for display.
#[must_use]
pub fn location_captured(c: Coordinates) -> String {
    format!(
        "Location captured ({:.3}, {:.3}). Press search to find nearby listings.",
        c.lat, c.lng
    )
}

/// Failure text for a geolocation outcome.
#[must_use]
pub fn location_failed(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::PermissionDenied => {
            "Could not get your location (permission denied).".to_string()
        }
        ResolutionOutcome::Timeout => "Could not get your location (timed out).".to_string(),
        _ => "Could not get your location.".to_string(),
    }
}
