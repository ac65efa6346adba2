//! Postal-code lookup as seen from the search page.

use nearby_core::ResolutionOutcome;
use nearby_geocode::error::{EMPTY_CODE, ENDPOINT_UNAVAILABLE, UNAVAILABLE};
use nearby_geocode::PostalLookupClient;

use crate::controller::SearchState;
use crate::locate::OutcomeFuture;
use crate::messages;

/// Validates `code` locally and, if it passes, returns the pending lookup.
///
/// Local failures settle immediately with inline feedback only: no network
/// call and no toast.
pub(crate) fn begin(
    client: Option<&PostalLookupClient>,
    code: &str,
    state: &mut SearchState,
) -> Result<OutcomeFuture, ResolutionOutcome> {
    let code = code.trim();
    if code.is_empty() {
        state.feedback.set_status(messages::POSTAL_PROMPT);
        return Err(ResolutionOutcome::LookupFailed(EMPTY_CODE.to_string()));
    }
    let Some(client) = client else {
        tracing::warn!("postal lookup requested but no geocoding endpoint is configured");
        state.feedback.set_status(messages::POSTAL_ENDPOINT_MISSING);
        return Err(ResolutionOutcome::LookupFailed(
            ENDPOINT_UNAVAILABLE.to_string(),
        ));
    };

    state.feedback.set_status(messages::POSTAL_QUERYING);
    let client = client.clone();
    let code = code.to_string();
    Ok(Box::pin(async move { client.lookup(&code).await }))
}

/// Applies a settled lookup to the shared state.
pub(crate) fn apply(outcome: &ResolutionOutcome, state: &mut SearchState) {
    match outcome {
        ResolutionOutcome::Resolved(c) => {
            tracing::debug!(lat = c.lat, lng = c.lng, "postal code resolved");
            state.set_coordinates(Some(c.rounded()));
            state.feedback.set_status(messages::POSTAL_RESOLVED);
        }
        ResolutionOutcome::LookupFailed(message) if message == EMPTY_CODE => {
            state.feedback.set_status(messages::POSTAL_PROMPT);
        }
        ResolutionOutcome::LookupFailed(message) if message == ENDPOINT_UNAVAILABLE => {
            state.feedback.set_status(messages::POSTAL_ENDPOINT_MISSING);
        }
        ResolutionOutcome::LookupFailed(message) if message != UNAVAILABLE => {
            state.feedback.set_status(message);
        }
        other => {
            tracing::debug!(outcome = %other, "postal lookup unavailable");
            state.feedback.set_status(messages::POSTAL_UNAVAILABLE);
        }
    }
}
