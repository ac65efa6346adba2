use thiserror::Error;

use nearby_core::ResolutionOutcome;

/// Message carried by the outcome when the trimmed code is empty.
pub const EMPTY_CODE: &str = "empty code";
/// Message carried by the outcome for transport and payload failures.
pub const UNAVAILABLE: &str = "unavailable";
/// Fallback for an application error that names no reason.
pub const NOT_FOUND: &str = "not found";
/// Message used when the page exposes no geocoding endpoint.
pub const ENDPOINT_UNAVAILABLE: &str = "endpoint unavailable";

/// Errors returned by the postal-code lookup client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The code was empty after trimming; no request was made.
    #[error("postal code is empty")]
    EmptyCode,

    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with an application-level error.
    #[error("geocoding error: {0}")]
    Application(String),

    /// The response body was not the expected JSON shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success response that did not carry both coordinates.
    #[error("response from {endpoint} is missing coordinates")]
    MissingCoordinates { endpoint: String },

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl From<LookupError> for ResolutionOutcome {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::EmptyCode => Self::LookupFailed(EMPTY_CODE.to_string()),
            LookupError::Http(ref e) if e.is_timeout() => Self::Timeout,
            LookupError::Application(message) => Self::LookupFailed(message),
            LookupError::Http(_)
            | LookupError::Deserialize { .. }
            | LookupError::MissingCoordinates { .. } => Self::LookupFailed(UNAVAILABLE.to_string()),
            LookupError::InvalidEndpoint { .. } => {
                Self::LookupFailed(ENDPOINT_UNAVAILABLE.to_string())
            }
        }
    }
}
