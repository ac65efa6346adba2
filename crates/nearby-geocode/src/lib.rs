pub mod client;
pub mod csrf;
pub mod error;
pub mod types;

pub use client::PostalLookupClient;
pub use csrf::{resolve_csrf_token, CSRF_HEADER};
pub use error::LookupError;
pub use types::GeocodeResponse;
