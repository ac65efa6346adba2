use reqwest::{Method, Url};

use super::{
    resolve_url, DispatchOutcome, PendingSubmission, RequestTransport, TransportFuture,
    TransportKind,
};
use crate::error::DispatchError;

/// A full-page navigation: following a link, or posting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub verb: Method,
    pub url: Url,
    /// Urlencoded form body. Always empty for `GET`.
    pub form: Vec<(String, String)>,
}

impl Navigation {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            verb: Method::GET,
            url,
            form: Vec::new(),
        }
    }
}

/// Performs a full-page navigation.
pub trait Navigator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DispatchError::Navigation`] if the host cannot navigate.
    fn navigate(&self, navigation: &Navigation) -> Result<(), DispatchError>;
}

impl<F> Navigator for F
where
    F: Fn(&Navigation) -> Result<(), DispatchError> + Send + Sync,
{
    fn navigate(&self, navigation: &Navigation) -> Result<(), DispatchError> {
        self(navigation)
    }
}

/// Transport used when no partial-update layer exists: every dispatch is a
/// navigation to a full URL.
pub struct NavigatingTransport {
    base_url: Url,
    navigator: Box<dyn Navigator>,
}

impl NavigatingTransport {
    #[must_use]
    pub fn new(base_url: Url, navigator: Box<dyn Navigator>) -> Self {
        Self {
            base_url,
            navigator,
        }
    }

    fn go(&self, navigation: Navigation) -> Result<DispatchOutcome, DispatchError> {
        tracing::debug!(verb = %navigation.verb, url = %navigation.url, "navigating");
        self.navigator.navigate(&navigation)?;
        Ok(DispatchOutcome::Navigated {
            verb: navigation.verb,
            url: navigation.url,
        })
    }

    /// Replays a native form submission: `GET` fields become the query
    /// string, `POST` fields the form body.
    fn replay(&self, submission: PendingSubmission) -> Result<DispatchOutcome, DispatchError> {
        let mut url = resolve_url(&self.base_url, &submission.path)?;
        let navigation = match submission.verb {
            Method::GET => {
                if !submission.parameters.is_empty() {
                    url.query_pairs_mut().extend_pairs(
                        submission
                            .parameters
                            .iter()
                            .map(|(k, v)| (k.as_str(), v.as_str())),
                    );
                }
                Navigation::get(url)
            }
            Method::POST => Navigation {
                verb: Method::POST,
                url,
                form: submission.parameters,
            },
            other => {
                return Err(DispatchError::UnsupportedNavigation {
                    verb: other.to_string(),
                })
            }
        };
        self.go(navigation)
    }
}

impl RequestTransport for NavigatingTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Navigating
    }

    fn forward(&self, submission: PendingSubmission) -> TransportFuture<'_> {
        Box::pin(std::future::ready(self.replay(submission)))
    }

    fn hijack(&self, _submission: PendingSubmission, url: &str) -> TransportFuture<'_> {
        let result =
            resolve_url(&self.base_url, url).and_then(|url| self.go(Navigation::get(url)));
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording() -> (NavigatingTransport, Arc<Mutex<Vec<Navigation>>>) {
        let visited = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&visited);
        let navigator = move |navigation: &Navigation| {
            log.lock().unwrap().push(navigation.clone());
            Ok::<(), DispatchError>(())
        };
        let base = Url::parse("https://listings.example").unwrap();
        (NavigatingTransport::new(base, Box::new(navigator)), visited)
    }

    #[tokio::test]
    async fn hijack_navigates_to_assembled_url() {
        let (transport, visited) = recording();
        let submission = PendingSubmission::get("/search/results", vec![]);
        let outcome = transport
            .hijack(
                submission,
                "/search/results?lat=1.000000&lng=2.000000&limit=15&offset=0",
            )
            .await
            .unwrap();
        assert_eq!(
            outcome.url().as_str(),
            "https://listings.example/search/results?lat=1.000000&lng=2.000000&limit=15&offset=0"
        );
        let visited = visited.lock().unwrap();
        assert_eq!(visited.len(), 1);
        assert_eq!(visited[0].verb, Method::GET);
        assert!(visited[0].form.is_empty());
    }

    #[tokio::test]
    async fn forward_replays_get_fields_as_query() {
        let (transport, visited) = recording();
        let submission = PendingSubmission::get(
            "/search/results",
            vec![("address".to_string(), "Rua Augusta 10".to_string())],
        );
        transport.forward(submission).await.unwrap();
        let visited = visited.lock().unwrap();
        assert_eq!(
            visited[0].url.as_str(),
            "https://listings.example/search/results?address=Rua+Augusta+10"
        );
        assert!(visited[0].form.is_empty());
    }

    #[tokio::test]
    async fn forward_posts_form_fields_as_body() {
        let (transport, visited) = recording();
        let fields = vec![
            ("address".to_string(), "Rua Augusta 10".to_string()),
            ("limit".to_string(), "15".to_string()),
        ];
        let submission = PendingSubmission {
            verb: Method::POST,
            path: "/search/geocode".to_string(),
            parameters: fields.clone(),
            headers: Vec::new(),
        };
        let outcome = transport.forward(submission).await.unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::Navigated { ref verb, .. } if *verb == Method::POST
        ));

        let visited = visited.lock().unwrap();
        assert_eq!(visited.len(), 1);
        assert_eq!(visited[0].verb, Method::POST);
        assert_eq!(
            visited[0].url.as_str(),
            "https://listings.example/search/geocode"
        );
        assert_eq!(visited[0].form, fields);
    }

    #[tokio::test]
    async fn forward_refuses_other_verbs() {
        let (transport, visited) = recording();
        let mut submission = PendingSubmission::get("/search/results", vec![]);
        submission.verb = Method::PUT;
        let err = transport.forward(submission).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedNavigation { ref verb } if verb == "PUT"));
        assert!(visited.lock().unwrap().is_empty());
    }
}
