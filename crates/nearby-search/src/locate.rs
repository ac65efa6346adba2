//! Device geolocation wrapper.
//!
//! State machine: `Idle -> Requesting -> Settled(outcome)`. Overlapping
//! requests are allowed and never cancelled; each one settles on its own and
//! the one that settles last determines the stored coordinates
//! (last-settled-wins, not first-invoked-wins).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use nearby_core::{Coordinates, ResolutionOutcome};

use crate::controller::SearchState;
use crate::feedback::ToastKind;
use crate::messages;

/// Future returned by a device position request.
pub type PositionFuture = Pin<Box<dyn Future<Output = Result<Coordinates, PositionError>> + Send>>;

/// Future that yields a resolution outcome.
pub type OutcomeFuture = Pin<Box<dyn Future<Output = ResolutionOutcome> + Send>>;

/// Failures reported by the device capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
}

impl From<PositionError> for ResolutionOutcome {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::PermissionDenied => Self::PermissionDenied,
            PositionError::PositionUnavailable => Self::PositionUnavailable,
            PositionError::Timeout => Self::Timeout,
        }
    }
}

/// The device geolocation capability.
///
/// Timeouts belong to the implementation; the resolver only relays them.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> PositionFuture;
}

/// Observable resolver state.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    Idle,
    /// At least one request has not settled yet.
    Requesting,
    Settled(ResolutionOutcome),
}

/// How a call to [`LocationResolver::request`] proceeded.
pub enum LocationRequest {
    /// Settled without suspending (capability absent).
    Immediate(ResolutionOutcome),
    /// Suspended on the device; await the future, then pass its output to
    /// [`LocationResolver::apply`].
    Pending(OutcomeFuture),
}

pub struct LocationResolver {
    source: Option<Arc<dyn PositionSource>>,
    in_flight: usize,
    last: Option<ResolutionOutcome>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(source: Option<Arc<dyn PositionSource>>) -> Self {
        Self {
            source,
            in_flight: 0,
            last: None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn state(&self) -> ResolverState {
        if self.in_flight > 0 {
            return ResolverState::Requesting;
        }
        match &self.last {
            Some(outcome) => ResolverState::Settled(outcome.clone()),
            None => ResolverState::Idle,
        }
    }

    /// Starts a position request.
    ///
    /// Without a capability this settles immediately as
    /// `CapabilityUnavailable` and raises an error toast; the form stays
    /// usable. Otherwise the offset is reset, the "locating" status is shown
    /// and a pending future is returned.
    pub fn request(&mut self, state: &mut SearchState) -> LocationRequest {
        let Some(source) = self.source.as_ref() else {
            let outcome = ResolutionOutcome::CapabilityUnavailable;
            tracing::debug!("geolocation capability absent");
            state
                .feedback
                .toast(ToastKind::Error, messages::GEOLOCATION_UNSUPPORTED);
            self.last = Some(outcome.clone());
            return LocationRequest::Immediate(outcome);
        };

        self.in_flight += 1;
        state.reset_offset();
        state.feedback.set_status(messages::LOCATING);
        tracing::debug!(in_flight = self.in_flight, "requesting device position");

        let position = source.current_position();
        LocationRequest::Pending(Box::pin(async move {
            match position.await {
                Ok(c) => ResolutionOutcome::Resolved(c.rounded()),
                Err(err) => err.into(),
            }
        }))
    }

    /// Applies a settled outcome. Whatever settles last overwrites the
    /// coordinates held in `state`.
    pub fn apply(&mut self, outcome: &ResolutionOutcome, state: &mut SearchState) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last = Some(outcome.clone());

        if let ResolutionOutcome::Resolved(c) = outcome {
            tracing::debug!(lat = c.lat, lng = c.lng, "device position captured");
            state.set_coordinates(Some(*c));
            state.feedback.set_status(&messages::location_captured(*c));
        } else {
            tracing::debug!(%outcome, "device position request failed");
            state.set_coordinates(None);
            let message = messages::location_failed(outcome);
            state.feedback.set_status(&message);
            state.feedback.toast(ToastKind::Error, &message);
        }
    }
}
