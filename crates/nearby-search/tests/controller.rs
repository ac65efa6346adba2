//! End-to-end controller tests: scripted device positions, a wiremock
//! geocoding endpoint and both transports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nearby_core::{Coordinates, PageConfig, ResolutionOutcome};
use nearby_geocode::PostalLookupClient;
use nearby_search::locate::PositionFuture;
use nearby_search::messages;
use nearby_search::{
    ControllerParts, DispatchError, DispatchOutcome, FeedbackChannel, InPlaceTransport,
    LoadingIndicator, Navigation, NavigatingTransport, PositionError, PositionSource,
    RequestTransport, ResolutionSource, Route, SearchController, Started, ToastHost, ToastKind,
    TransportKind,
};
use reqwest::{Method, Url};
use tokio::sync::oneshot;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Reply = Result<Coordinates, PositionError>;

/// Hands out one pre-registered reply per position request, settling each
/// whenever the test sends on the matching channel.
struct ScriptedSource {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

impl ScriptedSource {
    fn new(count: usize) -> (Arc<dyn PositionSource>, Vec<oneshot::Sender<Reply>>) {
        let mut senders = Vec::with_capacity(count);
        let mut replies = VecDeque::with_capacity(count);
        for _ in 0..count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            replies.push_back(rx);
        }
        let source: Arc<dyn PositionSource> = Arc::new(Self {
            replies: Mutex::new(replies),
        });
        (source, senders)
    }
}

impl PositionSource for ScriptedSource {
    fn current_position(&self) -> PositionFuture {
        let reply = self.replies.lock().unwrap().pop_front();
        Box::pin(async move {
            match reply {
                Some(rx) => rx.await.unwrap_or(Err(PositionError::PositionUnavailable)),
                None => Err(PositionError::PositionUnavailable),
            }
        })
    }
}

fn recording_transport() -> (Box<dyn RequestTransport>, Arc<Mutex<Vec<Navigation>>>) {
    let visited = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&visited);
    let navigator = move |navigation: &Navigation| {
        log.lock().unwrap().push(navigation.clone());
        Ok::<(), DispatchError>(())
    };
    let base = Url::parse("https://listings.example").unwrap();
    let transport: Box<dyn RequestTransport> =
        Box::new(NavigatingTransport::new(base, Box::new(navigator)));
    (transport, visited)
}

fn form_field<'a>(navigation: &'a Navigation, name: &str) -> Option<&'a str> {
    navigation
        .form
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn feedback() -> FeedbackChannel {
    FeedbackChannel::new(Some(ToastHost::new()), Box::new(|_: &str| {}))
}

fn postal_client(server: &MockServer) -> PostalLookupClient {
    PostalLookupClient::new(
        &format!("{}/search/geocode/cep", server.uri()),
        "test-token",
        5,
        "nearby-test/0.1",
    )
    .unwrap()
}

fn build(
    source: Option<Arc<dyn PositionSource>>,
    postal: Option<PostalLookupClient>,
    transport: Box<dyn RequestTransport>,
) -> SearchController {
    SearchController::new(
        Arc::new(PageConfig::default()),
        ControllerParts {
            position_source: source,
            postal,
            transport,
            feedback: feedback(),
        },
    )
}

fn in_place(server: &MockServer, loading: &LoadingIndicator) -> Box<dyn RequestTransport> {
    Box::new(
        InPlaceTransport::new(
            Url::parse(&server.uri()).unwrap(),
            "#search-results",
            loading.clone(),
            5,
            "nearby-test/0.1",
        )
        .unwrap(),
    )
}

async fn mount_geocode(server: &MockServer, code: &str, lat: f64, lng: f64) {
    Mock::given(method("POST"))
        .and(path("/search/geocode/cep"))
        .and(body_string(format!("cep={code}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": lat, "lng": lng})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn postal_code_fills_coordinates_and_drives_hijack() {
    let server = MockServer::start().await;
    mount_geocode(&server, "01001000", -23.55, -46.63).await;

    let (transport, visited) = recording_transport();
    let mut c = build(None, Some(postal_client(&server)), transport);

    assert!(matches!(c.lookup_postal_code("01001000"), Started::Pending(_)));
    assert_eq!(c.feedback().status(), messages::POSTAL_QUERYING);

    let settled = c.settle_all().await;
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].source, ResolutionSource::PostalCode);
    assert_eq!(
        settled[0].outcome,
        ResolutionOutcome::Resolved(Coordinates::new(-23.55, -46.63))
    );
    assert!(settled[0].submit_requested);
    assert_eq!(c.feedback().status(), messages::POSTAL_RESOLVED);
    assert!(c.feedback().toasts().unwrap().active().is_empty());

    let dispatched = c.submit().await.unwrap();
    assert!(matches!(dispatched.route, Route::Hijacked { .. }));
    let visited = visited.lock().unwrap();
    assert_eq!(visited.len(), 1);
    assert_eq!(visited[0].verb, Method::GET);
    assert_eq!(
        visited[0].url.as_str(),
        concat!(
            "https://listings.example/search/results",
            "?lat=-23.550000&lng=-46.630000&limit=15&offset=0&radius_km=10"
        )
    );
}

#[tokio::test]
async fn blank_postal_code_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (transport, _) = recording_transport();
    let mut c = build(None, Some(postal_client(&server)), transport);

    assert_eq!(
        c.lookup_postal_code("   "),
        Started::Immediate(ResolutionOutcome::LookupFailed("empty code".to_string()))
    );
    assert_eq!(c.pending_count(), 0);
    assert_eq!(c.feedback().status(), messages::POSTAL_PROMPT);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn postal_failure_keeps_existing_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": "CEP não encontrado."})),
        )
        .mount(&server)
        .await;

    let (source, mut replies) = ScriptedSource::new(1);
    let (transport, _) = recording_transport();
    let mut c = build(Some(source), Some(postal_client(&server)), transport);

    c.request_location();
    replies.remove(0).send(Ok(Coordinates::new(1.0, 2.0))).unwrap();
    c.settle_all().await;

    c.lookup_postal_code("99999999");
    let settled = c.settle_all().await;
    assert!(!settled[0].submit_requested);

    assert_eq!(c.feedback().status(), "CEP não encontrado.");
    assert_eq!(c.criteria().coordinates(), Some(Coordinates::new(1.0, 2.0)));
    assert!(c.feedback().toasts().unwrap().active().is_empty());
}

#[tokio::test]
async fn postal_lookup_sends_cookie_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/geocode/cep"))
        .and(header("X-CSRFToken", "from-cookie"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": 1.0, "lng": 2.0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = PageConfig {
        base_url: server.uri(),
        cookies: Some("theme=dark; csrftoken=from-cookie".to_string()),
        ..PageConfig::default()
    };
    let postal = PostalLookupClient::from_config(&config).unwrap();
    let (transport, _) = recording_transport();
    let mut c = build(None, postal, transport);

    c.lookup_postal_code("01001000");
    let settled = c.settle_all().await;
    assert!(settled[0].outcome.is_resolved());
}

#[tokio::test]
async fn last_settled_geolocation_wins() {
    let (source, mut replies) = ScriptedSource::new(2);
    let (transport, _) = recording_transport();
    let mut c = build(Some(source), None, transport);

    let Started::Pending(first) = c.request_location() else {
        panic!("expected pending");
    };
    let Started::Pending(second) = c.request_location() else {
        panic!("expected pending");
    };
    assert_eq!(c.pending_count(), 2);

    let tx_second = replies.pop().unwrap();
    let tx_first = replies.pop().unwrap();

    tx_second.send(Ok(Coordinates::new(10.0, 20.0))).unwrap();
    let settled = c.next_settlement().await.unwrap();
    assert_eq!(settled.id, second);
    assert_eq!(c.criteria().coordinates(), Some(Coordinates::new(10.0, 20.0)));

    tx_first.send(Ok(Coordinates::new(-1.0, -2.0))).unwrap();
    let settled = c.next_settlement().await.unwrap();
    assert_eq!(settled.id, first);
    assert_eq!(c.criteria().coordinates(), Some(Coordinates::new(-1.0, -2.0)));
    assert_eq!(c.state().mirror.lat, "-1.000000");
}

#[tokio::test]
async fn geolocation_settling_after_postal_lookup_wins() {
    let server = MockServer::start().await;
    mount_geocode(&server, "01001000", -23.55, -46.63).await;

    let (source, mut replies) = ScriptedSource::new(1);
    let (transport, _) = recording_transport();
    let mut c = build(Some(source), Some(postal_client(&server)), transport);

    c.request_location();
    c.lookup_postal_code("01001000");

    let settled = c.next_settlement().await.unwrap();
    assert_eq!(settled.source, ResolutionSource::PostalCode);

    replies.remove(0).send(Ok(Coordinates::new(5.0, 6.0))).unwrap();
    let settled = c.next_settlement().await.unwrap();
    assert_eq!(settled.source, ResolutionSource::Geolocation);
    assert_eq!(c.criteria().coordinates(), Some(Coordinates::new(5.0, 6.0)));
}

#[tokio::test]
async fn geolocation_failure_toasts_and_clears() {
    let (source, mut replies) = ScriptedSource::new(1);
    let (transport, _) = recording_transport();
    let mut c = build(Some(source), None, transport);

    c.request_location();
    replies.remove(0).send(Err(PositionError::Timeout)).unwrap();
    let settled = c.settle_all().await;

    assert_eq!(settled[0].outcome, ResolutionOutcome::Timeout);
    assert!(c.criteria().coordinates().is_none());
    assert_eq!(
        c.feedback().status(),
        "Could not get your location (timed out)."
    );
    let toasts = c.feedback().toasts().unwrap().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
}

#[tokio::test]
async fn typing_after_geolocation_clears_coordinates() {
    let (source, mut replies) = ScriptedSource::new(1);
    let (transport, visited) = recording_transport();
    let mut c = build(Some(source), None, transport);

    c.request_location();
    replies.remove(0).send(Ok(Coordinates::new(1.0, 2.0))).unwrap();
    c.settle_all().await;
    assert!(c.criteria().coordinates().is_some());

    c.input_address("Av. Paulista 1000");
    assert!(c.criteria().coordinates().is_none());
    assert_eq!(c.criteria().offset(), 0);
    assert!(c.state().mirror.lat.is_empty());

    let dispatched = c.submit().await.unwrap();
    assert_eq!(dispatched.route, Route::Passthrough);
    let visited = visited.lock().unwrap();
    assert_eq!(visited[0].verb, Method::POST);
    assert_eq!(
        visited[0].url.as_str(),
        "https://listings.example/search/geocode"
    );
    assert_eq!(
        form_field(&visited[0], "address"),
        Some("Av. Paulista 1000")
    );
    assert_eq!(form_field(&visited[0], "lat"), Some(""));
    assert_eq!(form_field(&visited[0], "lng"), Some(""));
}

#[tokio::test]
async fn address_typed_before_capture_still_wins() {
    let (source, mut replies) = ScriptedSource::new(1);
    let (transport, visited) = recording_transport();
    let mut c = build(Some(source), None, transport);

    c.input_address("Rua Augusta 10");
    c.request_location();
    replies.remove(0).send(Ok(Coordinates::new(1.0, 2.0))).unwrap();
    c.settle_all().await;
    assert!(c.criteria().coordinates().is_some());

    let dispatched = c.submit().await.unwrap();
    assert_eq!(dispatched.route, Route::Passthrough);
    let navigation = visited.lock().unwrap()[0].clone();
    assert_eq!(navigation.verb, Method::POST);
    assert_eq!(navigation.url.path(), "/search/geocode");
    assert_eq!(form_field(&navigation, "address"), Some("Rua Augusta 10"));
    assert_eq!(form_field(&navigation, "lat"), Some("1.000000"));
}

#[tokio::test]
async fn in_place_hijack_sends_bare_get_with_loading_indicator() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/results"))
        .and(query_param("lat", "-23.550000"))
        .and(query_param("lng", "-46.630000"))
        .and(query_param("limit", "15"))
        .and(query_param("offset", "0"))
        .and(query_param("radius_km", "10"))
        .and(header("HX-Request", "true"))
        .and(header("HX-Target", "search-results"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<ul></ul>")
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (source, mut replies) = ScriptedSource::new(1);
    let loading = LoadingIndicator::new();
    let mut c = build(Some(source), None, in_place(&server, &loading));
    assert_eq!(c.transport_kind(), TransportKind::InPlace);

    c.request_location();
    replies.remove(0).send(Ok(Coordinates::new(-23.55, -46.63))).unwrap();
    c.settle_all().await;

    let mut rx = loading.subscribe();
    let (result, visible_mid_flight) = tokio::join!(c.submit(), async {
        rx.changed().await.unwrap();
        *rx.borrow_and_update()
    });

    assert!(visible_mid_flight);
    assert!(!loading.is_visible());
    let dispatched = result.unwrap();
    match dispatched.outcome {
        DispatchOutcome::Swapped {
            target,
            status,
            body,
            ..
        } => {
            assert_eq!(target, "#search-results");
            assert_eq!(status, 200);
            assert_eq!(body, "<ul></ul>");
        }
        other => panic!("expected a swap, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn in_place_failure_hides_indicator_and_keeps_criteria() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/geocode"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let loading = LoadingIndicator::new();
    let mut c = build(None, None, in_place(&server, &loading));
    c.input_address("Rua Augusta 10");

    let err = c.submit().await.unwrap_err();
    assert!(matches!(err, DispatchError::UnexpectedStatus { status: 500, .. }));
    assert!(!loading.is_visible());
    assert_eq!(c.feedback().status(), messages::SEARCH_UNAVAILABLE);
    assert_eq!(c.criteria().address_text(), "Rua Augusta 10");

    assert!(c.submit().await.is_err());
}

#[tokio::test]
async fn in_place_passthrough_forwards_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/geocode"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header("HX-Request", "true"))
        .and(body_string(
            "address=Rua+Augusta+10&lat=&lng=&radius_km=10&category=food&limit=15&offset=0",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let loading = LoadingIndicator::new();
    let mut c = build(None, None, in_place(&server, &loading));
    c.input_address("Rua Augusta 10");
    c.select_category(["food"]);

    let dispatched = c.submit().await.unwrap();
    assert_eq!(dispatched.route, Route::Passthrough);
    assert_eq!(dispatched.transport, TransportKind::InPlace);
}

#[tokio::test]
async fn missing_toast_host_falls_back_to_alert() {
    let alerts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&alerts);
    let (transport, _) = recording_transport();
    let mut c = SearchController::new(
        Arc::new(PageConfig::default()),
        ControllerParts {
            position_source: None,
            postal: None,
            transport,
            feedback: FeedbackChannel::new(
                None,
                Box::new(move |m: &str| sink.lock().unwrap().push(m.to_string())),
            ),
        },
    );

    c.request_location();
    assert_eq!(
        alerts.lock().unwrap().as_slice(),
        [messages::GEOLOCATION_UNSUPPORTED.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn error_toasts_expire() {
    let (transport, _) = recording_transport();
    let mut c = build(None, None, transport);
    c.request_location();
    assert_eq!(c.sweep_toasts(), 0);

    tokio::time::advance(Duration::from_secs(7)).await;
    assert_eq!(c.sweep_toasts(), 1);
    assert!(c.feedback().toasts().unwrap().active().is_empty());
}
