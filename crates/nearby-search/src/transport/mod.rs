//! Transport strategies for the results request.
//!
//! Chosen once at startup: [`InPlaceTransport`] when the partial-update
//! request layer is present, [`NavigatingTransport`] otherwise.

mod in_place;
mod navigate;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::{Method, Url};

use nearby_core::PageConfig;

use crate::error::DispatchError;
use crate::loading::LoadingIndicator;

pub use in_place::InPlaceTransport;
pub use navigate::{Navigation, NavigatingTransport, Navigator};

/// Future returned by a transport.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<DispatchOutcome, DispatchError>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    InPlace,
    Navigating,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPlace => write!(f, "in-place"),
            Self::Navigating => write!(f, "navigating"),
        }
    }
}

/// A form submission about to leave the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub verb: Method,
    /// Path or URL, relative to the page origin.
    pub path: String,
    pub parameters: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl PendingSubmission {
    #[must_use]
    pub fn get(path: &str, parameters: Vec<(String, String)>) -> Self {
        Self {
            verb: Method::GET,
            path: path.to_string(),
            parameters,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Turns this submission into a bare `GET` of `url`: the outgoing
    /// parameters are dropped and so is any content-type header.
    pub fn rewrite_to_get(&mut self, url: &str) {
        self.verb = Method::GET;
        url.clone_into(&mut self.path);
        self.parameters.clear();
        self.headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
    }
}

/// What a transport did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The page navigated away to `url`.
    Navigated { verb: Method, url: Url },
    /// `target` was replaced with the response body.
    Swapped {
        target: String,
        url: Url,
        status: u16,
        body: String,
    },
}

impl DispatchOutcome {
    #[must_use]
    pub fn url(&self) -> &Url {
        match self {
            Self::Navigated { url, .. } | Self::Swapped { url, .. } => url,
        }
    }
}

/// A way of getting a results request to the server.
pub trait RequestTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Sends the submission exactly as the form built it.
    fn forward(&self, submission: PendingSubmission) -> TransportFuture<'_>;

    /// Replaces the submission with a request for the assembled `url`.
    fn hijack(&self, submission: PendingSubmission, url: &str) -> TransportFuture<'_>;
}

/// Resolves a page-relative path against the configured origin.
pub(crate) fn resolve_url(base: &Url, path: &str) -> Result<Url, DispatchError> {
    base.join(path).map_err(|e| DispatchError::InvalidUrl {
        url: path.to_string(),
        reason: e.to_string(),
    })
}

/// Picks the transport for this page.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidUrl`] if the base URL does not parse, or
/// [`DispatchError::Http`] if the HTTP client cannot be built.
pub fn select_transport(
    config: &PageConfig,
    loading: LoadingIndicator,
    navigator: Box<dyn Navigator>,
) -> Result<Box<dyn RequestTransport>, DispatchError> {
    let base_url = Url::parse(&config.base_url).map_err(|e| DispatchError::InvalidUrl {
        url: config.base_url.clone(),
        reason: e.to_string(),
    })?;

    if config.partial_updates {
        tracing::debug!("partial-update layer present; using in-place transport");
        let transport = InPlaceTransport::new(
            base_url,
            &config.results_target,
            loading,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Box::new(transport))
    } else {
        tracing::debug!("partial-update layer absent; using navigating transport");
        Ok(Box::new(NavigatingTransport::new(base_url, navigator)))
    }
}
