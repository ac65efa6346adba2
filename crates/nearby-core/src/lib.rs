//! Shared types and page configuration for the nearby-listings search controller.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod outcome;

pub use app_config::{FormMethod, PageConfig};
pub use config::{load_page_config, load_page_config_from_env};
pub use geo::{Coordinates, RadiusBound, COORDINATE_DECIMALS};
pub use outcome::ResolutionOutcome;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("radius bounds are inverted: min {min} km is greater than max {max} km")]
    InvertedRadiusBounds { min: f64, max: f64 },
}
