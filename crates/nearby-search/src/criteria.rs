//! Page-scoped search criteria and the plain form fields that mirror them.

use nearby_core::{Coordinates, PageConfig};

/// The single, page-scoped description of "where and what to search".
///
/// Fields are private so the invariants hold after every mutation:
/// - typing address text clears any stored coordinates;
/// - `offset` returns to `0` whenever the address or coordinates change;
/// - `radius_km` is only written through [`crate::RadiusController`];
/// - `limit` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    address_text: String,
    coordinates: Option<Coordinates>,
    radius_km: f64,
    category: Option<String>,
    limit: u32,
    offset: u32,
}

impl SearchCriteria {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            address_text: String::new(),
            coordinates: None,
            radius_km: config.radius.clamp(config.radius.default),
            category: None,
            limit: config.page_size.max(1),
            offset: 0,
        }
    }

    #[must_use]
    pub fn address_text(&self) -> &str {
        &self.address_text
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// True when the trimmed address text is non-empty.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.address_text.trim().is_empty()
    }

    /// Records typed address text. Typing makes the address authoritative, so
    /// stored coordinates are dropped and the offset is reset.
    pub fn set_address_text(&mut self, text: &str) {
        self.address_text = text.to_string();
        self.coordinates = None;
        self.offset = 0;
    }

    /// Stores (or clears) the coordinates, resetting the offset.
    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.coordinates = coordinates;
        self.offset = 0;
    }

    /// Selects the category from the checked controls, in document order.
    /// Only the first non-empty value is kept.
    pub fn select_category<'a, I>(&mut self, checked: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.category = checked
            .into_iter()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string);
    }

    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0;
    }

    pub(crate) fn set_radius_km(&mut self, radius_km: f64) {
        self.radius_km = radius_km;
    }
}

/// Plain form fields kept alongside the criteria for the unmodified
/// (non-hijacked) submission path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirroredFields {
    pub lat: String,
    pub lng: String,
    pub limit: String,
    pub offset: String,
}

impl MirroredFields {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            lat: String::new(),
            lng: String::new(),
            limit: limit.to_string(),
            offset: "0".to_string(),
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        match coordinates {
            Some(c) => {
                self.lat = c.lat_param();
                self.lng = c.lng_param();
            }
            None => {
                self.lat.clear();
                self.lng.clear();
            }
        }
    }

    pub fn reset_offset(&mut self) {
        self.offset = "0".to_string();
    }
}
