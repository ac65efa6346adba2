//! Canonical results-request parameters.
//!
//! Identical criteria always produce byte-identical query strings, so the
//! assembled URL doubles as a cache key and as a stable history entry.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::criteria::SearchCriteria;
use crate::radius::format_radius;

/// Unreserved characters stay literal; everything else is percent-encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds the ordered parameter list and URL for a results request.
#[derive(Debug, Clone)]
pub struct QueryAssembler {
    results_url: String,
}

impl QueryAssembler {
    #[must_use]
    pub fn new(results_url: &str) -> Self {
        Self {
            results_url: results_url.to_string(),
        }
    }

    /// Parameters in their fixed order: `lat`, `lng`, `limit`, `offset`,
    /// `category`, `radius_km`. Coordinates and category are omitted when
    /// absent; the radius is omitted only if it is not finite.
    #[must_use]
    pub fn params(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(c) = criteria.coordinates() {
            params.push(("lat", c.lat_param()));
            params.push(("lng", c.lng_param()));
        }
        params.push(("limit", criteria.limit().to_string()));
        params.push(("offset", criteria.offset().to_string()));
        if let Some(category) = criteria.category().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }
        let radius = criteria.radius_km();
        if radius.is_finite() {
            params.push(("radius_km", format_radius(radius)));
        }
        params
    }

    /// Encodes `params` as `key=value&...` without reordering.
    #[must_use]
    pub fn encode(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_VALUE),
                    utf8_percent_encode(value, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    #[must_use]
    pub fn query_string(criteria: &SearchCriteria) -> String {
        Self::encode(&Self::params(criteria))
    }

    /// The results URL with the canonical query appended.
    #[must_use]
    pub fn url(&self, criteria: &SearchCriteria) -> String {
        let separator = if self.results_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{separator}{}",
            self.results_url,
            Self::query_string(criteria)
        )
    }
}
