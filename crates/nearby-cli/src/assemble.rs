//! `assemble`: build the canonical results URL without touching the network.

use clap::Args;
use nearby_core::{Coordinates, PageConfig};
use nearby_search::{QueryAssembler, RadiusController, SearchCriteria};

#[derive(Debug, Args)]
pub struct AssembleArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
    /// Search radius in km; clamped to the configured bounds
    #[arg(long)]
    pub radius: Option<String>,
    /// Category filter
    #[arg(long)]
    pub category: Option<String>,
    /// Result offset for pagination
    #[arg(long)]
    pub offset: Option<u32>,
}

/// Returns the results URL the controller would hijack a submission to.
pub(crate) fn run_assemble(config: &PageConfig, args: &AssembleArgs) -> String {
    let mut criteria = SearchCriteria::new(config);
    criteria.set_coordinates(Some(Coordinates::new(args.lat, args.lng).rounded()));
    if let Some(category) = args.category.as_deref() {
        criteria.select_category([category]);
    }

    let mut radius = RadiusController::new(config.radius);
    if let Some(raw) = args.radius.as_deref() {
        radius.commit(raw, &mut criteria);
    }
    if let Some(offset) = args.offset {
        criteria.set_offset(offset);
    }

    QueryAssembler::new(&config.results_url).url(&criteria)
}
