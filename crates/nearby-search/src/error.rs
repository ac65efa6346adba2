use thiserror::Error;

/// Errors from dispatching a results request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The results endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Full-page navigation can only replay `GET` and `POST` submissions.
    #[error("cannot navigate with a {verb} submission")]
    UnsupportedNavigation { verb: String },

    #[error("navigation failed: {0}")]
    Navigation(String),
}
