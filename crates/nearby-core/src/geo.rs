//! Coordinate and radius value types.

use serde::{Deserialize, Serialize};

/// Decimal digits carried by coordinates at the request boundary.
pub const COORDINATE_DECIMALS: usize = 6;

const COORDINATE_SCALE: f64 = 1_000_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns a copy with both axes rounded to [`COORDINATE_DECIMALS`] digits.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            lat: round_to_precision(self.lat),
            lng: round_to_precision(self.lng),
        }
    }

    /// Latitude formatted as a query value, e.g. `-23.550000`.
    #[must_use]
    pub fn lat_param(&self) -> String {
        format_degrees(self.lat)
    }

    /// Longitude formatted as a query value, e.g. `-46.630000`.
    #[must_use]
    pub fn lng_param(&self) -> String {
        format_degrees(self.lng)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Formats a degree value with exactly six fractional digits.
#[must_use]
pub fn format_degrees(value: f64) -> String {
    format!("{:.*}", COORDINATE_DECIMALS, value)
}

fn round_to_precision(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// Permitted search radius in kilometres, read once from page configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusBound {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl RadiusBound {
    /// Clamps a finite value into `[min, max]`; non-finite input falls back to
    /// the default before clamping.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_finite() {
            value
        } else {
            self.default
        };
        value.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for RadiusBound {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 50.0,
            default: 10.0,
        }
    }
}
