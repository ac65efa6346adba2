//! The search controller: one object owning the page's shared search state
//! and the components that read and write it.
//!
//! Asynchronous work (device position requests, postal lookups) is held in a
//! single [`FuturesUnordered`] set. [`SearchController::next_settlement`]
//! applies outcomes in the order they complete, which makes the ordering
//! policy explicit: nothing is ever cancelled, and the operation that
//! settles last owns the stored coordinates.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};

use nearby_core::{Coordinates, FormMethod, PageConfig, ResolutionOutcome};
use nearby_geocode::{resolve_csrf_token, PostalLookupClient};
use reqwest::Method;

use crate::criteria::{MirroredFields, SearchCriteria};
use crate::dispatch::{Dispatched, RequestDispatcher, Route};
use crate::error::DispatchError;
use crate::feedback::FeedbackChannel;
use crate::locate::{LocationRequest, LocationResolver, PositionSource, ResolverState};
use crate::messages;
use crate::postal;
use crate::query::QueryAssembler;
use crate::radius::RadiusController;
use crate::transport::{PendingSubmission, RequestTransport, TransportKind};

type SettlementFuture = Pin<Box<dyn Future<Output = Settlement> + Send>>;

/// Identifies one asynchronous resolution, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Geolocation,
    PostalCode,
}

/// A completed resolution, already applied to the controller's state.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub id: RequestId,
    pub source: ResolutionSource,
    pub outcome: ResolutionOutcome,
    /// Set when the resolution filled in coordinates; the page submits the
    /// search form right after.
    pub submit_requested: bool,
}

/// How a resolution request started.
#[derive(Debug, Clone, PartialEq)]
pub enum Started {
    /// Settled synchronously; nothing was queued.
    Immediate(ResolutionOutcome),
    /// Queued; its outcome arrives through
    /// [`SearchController::next_settlement`].
    Pending(RequestId),
}

/// Mutable state shared by every component on the page.
#[derive(Debug)]
pub struct SearchState {
    pub criteria: SearchCriteria,
    pub mirror: MirroredFields,
    pub feedback: FeedbackChannel,
}

impl SearchState {
    #[must_use]
    pub fn new(config: &PageConfig, feedback: FeedbackChannel) -> Self {
        let criteria = SearchCriteria::new(config);
        let mirror = MirroredFields::new(criteria.limit());
        Self {
            criteria,
            mirror,
            feedback,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.criteria.set_coordinates(coordinates);
        self.mirror.set_coordinates(coordinates);
        self.mirror.reset_offset();
    }

    pub fn set_address_text(&mut self, text: &str) {
        self.criteria.set_address_text(text);
        self.mirror.set_coordinates(None);
        self.mirror.reset_offset();
    }

    pub fn reset_offset(&mut self) {
        self.criteria.reset_offset();
        self.mirror.reset_offset();
    }

    /// The submission the search form would send on its own.
    #[must_use]
    pub fn native_submission(&self, form: &SearchForm, radius_display: &str) -> PendingSubmission {
        let mut fields = vec![
            ("address".to_string(), self.criteria.address_text().to_string()),
            ("lat".to_string(), self.mirror.lat.clone()),
            ("lng".to_string(), self.mirror.lng.clone()),
            ("radius_km".to_string(), radius_display.to_string()),
        ];
        if let Some(category) = self.criteria.category() {
            fields.push(("category".to_string(), category.to_string()));
        }
        fields.push(("limit".to_string(), self.mirror.limit.clone()));
        fields.push(("offset".to_string(), self.mirror.offset.clone()));

        match form.method {
            FormMethod::Get => PendingSubmission::get(&form.action, fields),
            FormMethod::Post => {
                if !form.token.is_empty() {
                    fields.push((FORM_TOKEN_FIELD.to_string(), form.token.clone()));
                }
                PendingSubmission {
                    verb: Method::POST,
                    path: form.action.clone(),
                    parameters: fields,
                    headers: Vec::new(),
                }
                .with_header("Content-Type", "application/x-www-form-urlencoded")
            }
        }
    }
}

/// Hidden anti-forgery field carried by a posted search form.
pub const FORM_TOKEN_FIELD: &str = "csrfmiddlewaretoken";

/// Where and how the search form submits when nothing replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub action: String,
    pub method: FormMethod,
    /// Anti-forgery token; empty when the page carries none.
    pub token: String,
}

impl SearchForm {
    #[must_use]
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            action: config.search_action.clone(),
            method: config.search_method,
            token: resolve_csrf_token(config.csrf_meta.as_deref(), config.cookies.as_deref()),
        }
    }
}

/// Collaborators handed to the controller at construction.
pub struct ControllerParts {
    /// `None` when the device has no geolocation capability.
    pub position_source: Option<Arc<dyn PositionSource>>,
    /// `None` when the page exposes no geocoding endpoint.
    pub postal: Option<PostalLookupClient>,
    pub transport: Box<dyn RequestTransport>,
    pub feedback: FeedbackChannel,
}

pub struct SearchController {
    config: Arc<PageConfig>,
    state: SearchState,
    form: SearchForm,
    radius: RadiusController,
    locator: LocationResolver,
    postal: Option<PostalLookupClient>,
    dispatcher: RequestDispatcher,
    pending: FuturesUnordered<SettlementFuture>,
    next_id: u64,
}

impl SearchController {
    #[must_use]
    pub fn new(config: Arc<PageConfig>, parts: ControllerParts) -> Self {
        let mut state = SearchState::new(&config, parts.feedback);
        state.feedback.set_status(messages::DEFAULT_GUIDANCE);

        let assembler = QueryAssembler::new(&config.results_url);
        Self {
            form: SearchForm::from_config(&config),
            radius: RadiusController::new(config.radius),
            locator: LocationResolver::new(parts.position_source),
            postal: parts.postal,
            dispatcher: RequestDispatcher::new(assembler, parts.transport),
            pending: FuturesUnordered::new(),
            next_id: 0,
            state,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn criteria(&self) -> &SearchCriteria {
        &self.state.criteria
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn feedback(&self) -> &FeedbackChannel {
        &self.state.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FeedbackChannel {
        &mut self.state.feedback
    }

    #[must_use]
    pub fn radius_display(&self) -> &str {
        self.radius.displayed()
    }

    #[must_use]
    pub fn locator_state(&self) -> ResolverState {
        self.locator.state()
    }

    #[must_use]
    pub fn transport_kind(&self) -> TransportKind {
        self.dispatcher.transport_kind()
    }

    /// Number of resolutions queued but not yet settled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The canonical results URL for the current criteria.
    #[must_use]
    pub fn results_url(&self) -> String {
        self.dispatcher.assembler().url(&self.state.criteria)
    }

    /// Address field input.
    pub fn input_address(&mut self, text: &str) {
        self.state.set_address_text(text);
        let message = if text.trim().is_empty() {
            messages::DEFAULT_GUIDANCE
        } else {
            messages::ADDRESS_ENTERED
        };
        self.state.feedback.set_status(message);
    }

    /// The clear-address action.
    pub fn clear_address(&mut self) {
        self.state.set_address_text("");
        self.state.feedback.set_status(messages::DEFAULT_GUIDANCE);
    }

    /// Radius change event. Returns the committed, clamped value.
    pub fn change_radius(&mut self, raw: &str) -> f64 {
        self.radius.commit(raw, &mut self.state.criteria)
    }

    /// Puts a radius back into the control without a change event, as when
    /// the browser restores form state. Submission re-clamps it.
    pub fn restore_radius(&mut self, raw: &str) {
        self.radius.restore_displayed(raw);
    }

    /// Category controls changed; `checked` lists checked values in order.
    pub fn select_category<'a, I>(&mut self, checked: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.state.criteria.select_category(checked);
    }

    /// "Use my location".
    pub fn request_location(&mut self) -> Started {
        match self.locator.request(&mut self.state) {
            LocationRequest::Immediate(outcome) => Started::Immediate(outcome),
            LocationRequest::Pending(future) => {
                let id = self.queue(ResolutionSource::Geolocation, future);
                Started::Pending(id)
            }
        }
    }

    /// Postal-code form submission.
    pub fn lookup_postal_code(&mut self, code: &str) -> Started {
        match postal::begin(self.postal.as_ref(), code, &mut self.state) {
            Ok(future) => {
                let id = self.queue(ResolutionSource::PostalCode, future);
                Started::Pending(id)
            }
            Err(outcome) => Started::Immediate(outcome),
        }
    }

    fn queue<F>(&mut self, source: ResolutionSource, future: F) -> RequestId
    where
        F: Future<Output = ResolutionOutcome> + Send + 'static,
    {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        tracing::debug!(?id, ?source, "resolution queued");
        self.pending.push(Box::pin(async move {
            let outcome = future.await;
            Settlement {
                id,
                source,
                submit_requested: outcome.is_resolved(),
                outcome,
            }
        }));
        id
    }

    /// Waits for the next queued resolution to complete and applies it.
    /// Returns `None` when nothing is pending.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        let settlement = self.pending.next().await?;
        tracing::debug!(
            id = ?settlement.id,
            source = ?settlement.source,
            outcome = %settlement.outcome,
            "resolution settled"
        );
        match settlement.source {
            ResolutionSource::Geolocation => {
                self.locator.apply(&settlement.outcome, &mut self.state);
            }
            ResolutionSource::PostalCode => postal::apply(&settlement.outcome, &mut self.state),
        }
        Some(settlement)
    }

    /// Applies every queued resolution, in completion order.
    pub async fn settle_all(&mut self) -> Vec<Settlement> {
        let mut settled = Vec::with_capacity(self.pending.len());
        while let Some(settlement) = self.next_settlement().await {
            settled.push(settlement);
        }
        settled
    }

    /// Drops expired toasts.
    pub fn sweep_toasts(&mut self) -> usize {
        self.state
            .feedback
            .toasts_mut()
            .map_or(0, crate::feedback::ToastHost::sweep)
    }

    /// Search form submission.
    ///
    /// Resets the offset and re-clamps the radius before routing, so values
    /// restored from earlier form state are normalized too.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`DispatchError`]. The failure is also shown
    /// as feedback and the criteria stay intact, so the form can be
    /// submitted again.
    pub async fn submit(&mut self) -> Result<Dispatched, DispatchError> {
        self.state.reset_offset();
        self.radius.commit_current(&mut self.state.criteria);

        if matches!(
            self.dispatcher.route(&self.state.criteria),
            Route::Hijacked { .. }
        ) {
            self.state.feedback.set_status(messages::SEARCHING_NEARBY);
        }

        let submission = self
            .state
            .native_submission(&self.form, self.radius.displayed());
        match self
            .dispatcher
            .dispatch(&self.state.criteria, submission)
            .await
        {
            Ok(dispatched) => Ok(dispatched),
            Err(err) => {
                tracing::warn!(error = %err, "search dispatch failed");
                self.state.feedback.set_status(messages::SEARCH_UNAVAILABLE);
                Err(err)
            }
        }
    }
}
