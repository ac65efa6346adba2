//! `search`: run one full controller cycle.
//!
//! Address text, a device position and a postal code may all be supplied;
//! they are applied in that order, resolutions settle, and the form is
//! submitted through the transport the configuration selects.

use std::sync::Arc;

use clap::Args;
use nearby_core::{Coordinates, PageConfig};
use nearby_geocode::PostalLookupClient;
use nearby_search::locate::PositionFuture;
use nearby_search::{
    select_transport, ControllerParts, DispatchError, DispatchOutcome, FeedbackChannel,
    LoadingIndicator, Navigation, PositionSource, SearchController, ToastHost,
};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text address; when non-empty the server resolves it
    #[arg(long)]
    pub address: Option<String>,
    /// Postal code to geocode through the configured endpoint
    #[arg(long)]
    pub postal_code: Option<String>,
    /// Request the device position (needs --lat/--lng to succeed)
    #[arg(long)]
    pub locate: bool,
    /// Latitude reported by the simulated device
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude reported by the simulated device
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
    /// Search radius in km; clamped to the configured bounds
    #[arg(long)]
    pub radius: Option<String>,
    /// Category filter
    #[arg(long)]
    pub category: Option<String>,
    /// Fetch results in place instead of navigating
    #[arg(long)]
    pub in_place: bool,
}

/// A device that always reports the same fix.
struct FixedPosition(Coordinates);

impl PositionSource for FixedPosition {
    fn current_position(&self) -> PositionFuture {
        let fix = self.0;
        Box::pin(async move { Ok(fix) })
    }
}

pub(crate) async fn run_search(config: Arc<PageConfig>, args: &SearchArgs) -> anyhow::Result<()> {
    let config = if args.in_place && !config.partial_updates {
        Arc::new(PageConfig {
            partial_updates: true,
            ..(*config).clone()
        })
    } else {
        config
    };

    let navigator = |navigation: &Navigation| {
        tracing::info!(
            verb = %navigation.verb,
            url = %navigation.url,
            fields = navigation.form.len(),
            "navigation requested"
        );
        Ok::<(), DispatchError>(())
    };
    let transport = select_transport(&config, LoadingIndicator::new(), Box::new(navigator))?;
    let postal = PostalLookupClient::from_config(&config)?;

    let position_source: Option<Arc<dyn PositionSource>> = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(Arc::new(FixedPosition(Coordinates::new(lat, lng)))),
        _ => None,
    };
    let wants_location = args.locate || position_source.is_some();

    let feedback = FeedbackChannel::new(
        Some(ToastHost::new()),
        Box::new(|message: &str| eprintln!("alert: {message}")),
    );
    let mut controller = SearchController::new(
        Arc::clone(&config),
        ControllerParts {
            position_source,
            postal,
            transport,
            feedback,
        },
    );

    if let Some(raw) = args.radius.as_deref() {
        controller.change_radius(raw);
    }
    if let Some(category) = args.category.as_deref() {
        controller.select_category([category]);
    }
    if let Some(address) = args.address.as_deref() {
        controller.input_address(address);
    }
    if wants_location {
        controller.request_location();
    }
    if let Some(code) = args.postal_code.as_deref() {
        controller.lookup_postal_code(code);
    }

    let settled = controller.settle_all().await;
    for settlement in &settled {
        tracing::info!(
            id = ?settlement.id,
            source = ?settlement.source,
            outcome = %settlement.outcome,
            submit_requested = settlement.submit_requested,
            "resolution settled"
        );
    }
    report_feedback(&controller);

    // Resolved settlements each request a submit; one after settling serves them all.
    let dispatched = controller.submit().await?;
    tracing::info!(
        route = ?dispatched.route,
        transport = %dispatched.transport,
        "search dispatched"
    );
    match dispatched.outcome {
        DispatchOutcome::Navigated { verb, url } => println!("{verb} {url}"),
        DispatchOutcome::Swapped { body, .. } => println!("{body}"),
    }

    Ok(())
}

fn report_feedback(controller: &SearchController) {
    let feedback = controller.feedback();
    if !feedback.status().is_empty() {
        eprintln!("{}", feedback.status());
    }
    if let Some(host) = feedback.toasts() {
        for toast in host.active() {
            eprintln!("[{}] {}", toast.kind.title(), toast.message);
        }
    }
}
