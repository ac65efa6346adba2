//! HTTP client for the postal-code geocoding endpoint.
//!
//! Wraps `reqwest` with the endpoint's form encoding, anti-forgery header and
//! JSON envelope. [`PostalLookupClient::lookup`] never fails: every error is
//! folded into a [`ResolutionOutcome`] so callers can render it directly.

use std::time::Duration;

use reqwest::{Client, Url};

use nearby_core::{Coordinates, PageConfig, ResolutionOutcome};

use crate::csrf::{resolve_csrf_token, CSRF_HEADER};
use crate::error::LookupError;
use crate::types::GeocodeResponse;

/// Form field that carries the postal code.
const CODE_FIELD: &str = "cep";

/// Client for the postal-code geocoding endpoint.
///
/// Cheap to clone; clones share the underlying connection pool. There is no
/// retry: a failed lookup is reported once and the caller may call again.
#[derive(Clone)]
pub struct PostalLookupClient {
    client: Client,
    endpoint: Url,
    csrf_token: String,
}

impl PostalLookupClient {
    /// Creates a client that posts to `endpoint` with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`LookupError::InvalidEndpoint`] if
    /// `endpoint` is not an absolute URL.
    pub fn new(
        endpoint: &str,
        csrf_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| LookupError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            csrf_token: csrf_token.to_owned(),
        })
    }

    /// Builds a client from page configuration, resolving the endpoint
    /// against the base URL and the token from the meta/cookie sources.
    ///
    /// Returns `Ok(None)` when the page exposes no geocoding endpoint.
    ///
    /// # Errors
    ///
    /// Same as [`PostalLookupClient::new`].
    pub fn from_config(config: &PageConfig) -> Result<Option<Self>, LookupError> {
        let Some(path) = config.geocode_endpoint.as_deref() else {
            return Ok(None);
        };
        let endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| LookupError::InvalidEndpoint {
                url: path.to_string(),
                reason: e.to_string(),
            })?;
        let token = resolve_csrf_token(config.csrf_meta.as_deref(), config.cookies.as_deref());
        if token.is_empty() {
            tracing::warn!("no anti-forgery token found; postal lookups will likely be rejected");
        }
        Self::new(
            endpoint.as_str(),
            &token,
            config.request_timeout_secs,
            &config.user_agent,
        )
        .map(Some)
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves `code` to coordinates, folding every failure into the outcome.
    pub async fn lookup(&self, code: &str) -> ResolutionOutcome {
        match self.try_lookup(code).await {
            Ok(coordinates) => ResolutionOutcome::Resolved(coordinates),
            Err(err) => {
                match &err {
                    LookupError::Http(e) => {
                        tracing::warn!(error = %e, "postal lookup transport failure");
                    }
                    LookupError::EmptyCode => {}
                    other => tracing::debug!(error = %other, "postal lookup failed"),
                }
                err.into()
            }
        }
    }

    /// Resolves `code` to coordinates.
    ///
    /// The code is trimmed first; an empty code fails without touching the
    /// network.
    ///
    /// # Errors
    ///
    /// - [`LookupError::EmptyCode`] if `code` is blank.
    /// - [`LookupError::Http`] on network failure or timeout.
    /// - [`LookupError::Deserialize`] if the body is not JSON.
    /// - [`LookupError::Application`] if the endpoint reports an error.
    /// - [`LookupError::MissingCoordinates`] if a success body lacks `lat`/`lng`.
    pub async fn try_lookup(&self, code: &str) -> Result<Coordinates, LookupError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LookupError::EmptyCode);
        }

        tracing::debug!(code, endpoint = %self.endpoint, "looking up postal code");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CSRF_HEADER, &self.csrf_token)
            .form(&[(CODE_FIELD, code)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let payload: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
                context: format!("geocode(code={code}, status={status})"),
                source: e,
            })?;

        Self::interpret(&self.endpoint, status.is_success(), payload)
    }

    /// Maps a decoded payload to coordinates or an application error.
    fn interpret(
        endpoint: &Url,
        success: bool,
        payload: GeocodeResponse,
    ) -> Result<Coordinates, LookupError> {
        if !success || payload.error.is_some() {
            let message = payload
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| crate::error::NOT_FOUND.to_string());
            return Err(LookupError::Application(message));
        }
        match (payload.lat, payload.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Ok(Coordinates::new(lat, lng))
            }
            _ => Err(LookupError::MissingCoordinates {
                endpoint: endpoint.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
