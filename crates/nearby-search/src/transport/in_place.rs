use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};

use super::{
    resolve_url, DispatchOutcome, PendingSubmission, RequestTransport, TransportFuture,
    TransportKind,
};
use crate::error::DispatchError;
use crate::loading::LoadingIndicator;

/// Transport used when the partial-update layer is present: requests are
/// issued in place and the response replaces a designated result region.
///
/// The loading indicator is visible exactly while a request is in flight.
pub struct InPlaceTransport {
    client: Client,
    base_url: Url,
    target: String,
    loading: LoadingIndicator,
}

impl InPlaceTransport {
    /// # Errors
    ///
    /// Returns [`DispatchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: Url,
        target: &str,
        loading: LoadingIndicator,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            target: target.to_string(),
            loading,
        })
    }

    #[must_use]
    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    fn build(
        &self,
        submission: &PendingSubmission,
    ) -> Result<(RequestBuilder, Url), DispatchError> {
        let mut url = resolve_url(&self.base_url, &submission.path)?;
        let is_get = submission.verb == Method::GET;

        if is_get && !submission.parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(
                submission
                    .parameters
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut request = self.client.request(submission.verb.clone(), url.clone());
        if !is_get {
            request = request.form(&submission.parameters);
        }
        request = request
            .header("HX-Request", "true")
            .header("HX-Target", self.target.trim_start_matches('#'));
        // A bodiless GET has no content type; a form body sets its own.
        for (name, value) in &submission.headers {
            if name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            request = request.header(name.as_str(), value.as_str());
        }
        Ok((request, url))
    }

    async fn execute(
        &self,
        submission: PendingSubmission,
    ) -> Result<DispatchOutcome, DispatchError> {
        let (request, url) = self.build(&submission)?;
        tracing::debug!(verb = %submission.verb, %url, target = %self.target, "in-place request");

        let guard = self.loading.begin();
        match self.send(request, url).await {
            Ok(outcome) => {
                guard.settle();
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "in-place request failed");
                guard.error();
                Err(err)
            }
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: Url,
    ) -> Result<DispatchOutcome, DispatchError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(DispatchOutcome::Swapped {
            target: self.target.clone(),
            url,
            status: status.as_u16(),
            body,
        })
    }
}

impl RequestTransport for InPlaceTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::InPlace
    }

    fn forward(&self, submission: PendingSubmission) -> TransportFuture<'_> {
        Box::pin(self.execute(submission))
    }

    fn hijack(&self, mut submission: PendingSubmission, url: &str) -> TransportFuture<'_> {
        submission.rewrite_to_get(url);
        Box::pin(self.execute(submission))
    }
}
