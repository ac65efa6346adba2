//! Client-side search-request controller.
//!
//! Reconciles typed address text, device geolocation and postal-code lookup
//! into one canonical results request, then dispatches it through either a
//! navigating or an in-place transport.

pub mod controller;
pub mod criteria;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod loading;
pub mod locate;
pub mod messages;
mod postal;
pub mod query;
pub mod radius;
pub mod transport;

pub use controller::{
    ControllerParts, RequestId, ResolutionSource, SearchController, SearchForm, Settlement,
    Started, FORM_TOKEN_FIELD,
};
pub use criteria::{MirroredFields, SearchCriteria};
pub use dispatch::{Dispatched, RequestDispatcher, Route};
pub use error::DispatchError;
pub use feedback::{AlertSink, FeedbackChannel, Toast, ToastHost, ToastId, ToastKind};
pub use loading::LoadingIndicator;
pub use locate::{LocationResolver, PositionError, PositionSource, ResolverState};
pub use query::QueryAssembler;
pub use radius::RadiusController;
pub use transport::{
    select_transport, DispatchOutcome, InPlaceTransport, NavigatingTransport, Navigation,
    Navigator, PendingSubmission, RequestTransport, TransportKind,
};
