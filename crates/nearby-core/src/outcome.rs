use std::fmt;

use crate::geo::Coordinates;

/// Result of any attempt to turn a user action into coordinates, whether via
/// the device geolocation capability or a postal-code lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved(Coordinates),
    PermissionDenied,
    /// The device could not determine a position (no fix, hardware error).
    PositionUnavailable,
    CapabilityUnavailable,
    Timeout,
    LookupFailed(String),
}

impl ResolutionOutcome {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(c) => write!(f, "resolved ({}, {})", c.lat_param(), c.lng_param()),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::PositionUnavailable => write!(f, "position unavailable"),
            Self::CapabilityUnavailable => write!(f, "capability unavailable"),
            Self::Timeout => write!(f, "timed out"),
            Self::LookupFailed(message) => write!(f, "lookup failed: {message}"),
        }
    }
}
