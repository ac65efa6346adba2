//! Submission routing: decides whether a submission is replaced with the
//! canonical coordinate query or sent as the form built it.

use crate::criteria::SearchCriteria;
use crate::error::DispatchError;
use crate::query::QueryAssembler;
use crate::transport::{DispatchOutcome, PendingSubmission, RequestTransport, TransportKind};

/// Which path a submission takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The submission is replaced with a request for `url`.
    Hijacked { url: String },
    /// The form's own submission proceeds unmodified; the server resolves the
    /// address itself.
    Passthrough,
}

/// Result of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub route: Route,
    pub transport: TransportKind,
    pub outcome: DispatchOutcome,
}

pub struct RequestDispatcher {
    assembler: QueryAssembler,
    transport: Box<dyn RequestTransport>,
}

impl RequestDispatcher {
    #[must_use]
    pub fn new(assembler: QueryAssembler, transport: Box<dyn RequestTransport>) -> Self {
        Self {
            assembler,
            transport,
        }
    }

    #[must_use]
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    #[must_use]
    pub fn assembler(&self) -> &QueryAssembler {
        &self.assembler
    }

    /// A submission is hijacked only when the address is empty and
    /// coordinates are present. Any typed address wins, even if coordinates
    /// were captured after it.
    #[must_use]
    pub fn route(&self, criteria: &SearchCriteria) -> Route {
        if criteria.has_address() || criteria.coordinates().is_none() {
            return Route::Passthrough;
        }
        Route::Hijacked {
            url: self.assembler.url(criteria),
        }
    }

    /// Routes and sends `submission`.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`DispatchError`].
    pub async fn dispatch(
        &self,
        criteria: &SearchCriteria,
        submission: PendingSubmission,
    ) -> Result<Dispatched, DispatchError> {
        let route = self.route(criteria);
        let transport = self.transport.kind();
        tracing::debug!(?route, %transport, "dispatching search");

        let outcome = match &route {
            Route::Hijacked { url } => self.transport.hijack(submission, url).await?,
            Route::Passthrough => self.transport.forward(submission).await?,
        };

        Ok(Dispatched {
            route,
            transport,
            outcome,
        })
    }
}
