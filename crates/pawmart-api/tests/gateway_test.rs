#![allow(clippy::unwrap_used)]
// Integration tests for `Gateway` using wiremock.

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pawmart_api::{
    Attachment, Endpoint, Endpoints, Error, FormPayload, Gateway, Interceptor, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Gateway, Endpoints) {
    let server = MockServer::start().await;
    let gateway = Gateway::new(&TransportConfig::default()).unwrap();
    let endpoints = Endpoints::parse(&server.uri()).unwrap();
    (server, gateway, endpoints)
}

#[derive(Default)]
struct RecordingInterceptor {
    seen: Mutex<Vec<String>>,
}

impl Interceptor for RecordingInterceptor {
    fn on_request(&self, request: &reqwest::Request) {
        self.seen
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method(), request.url().path()));
    }
}

// ── Success path ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_returns_json_data() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "petId": 1, "name": "Rex" }
        ])))
        .mount(&server)
        .await;

    let resp = gateway.get(endpoints.url(Endpoint::Pets)).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, json!([{ "petId": 1, "name": "Rex" }]));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/pets/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = gateway
        .delete(endpoints.resource(Endpoint::Pets, &["7"]))
        .await
        .unwrap();

    assert_eq!(resp.status, 204);
    assert!(resp.data.is_null());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(header("content-type", "application/json"))
        .and(body_string_contains("\"name\":\"Kibble\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "productId": 9 })))
        .mount(&server)
        .await;

    let resp = gateway
        .post(endpoints.url(Endpoint::Products), json!({ "name": "Kibble" }))
        .await
        .unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.data["productId"], 9);
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_default_headers_beyond_credentials() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    gateway.get(endpoints.url(Endpoint::Blogs)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert!(headers.get("user-agent").is_none());
    assert!(headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_bearer_attached_only_when_set() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "no token" })))
        .with_priority(5)
        .mount(&server)
        .await;

    let anonymous = gateway.get(endpoints.url(Endpoint::Orders)).await;
    assert!(matches!(anonymous, Err(Error::Server { status: 401, .. })));

    gateway
        .credential()
        .set(SecretString::from("tok-123".to_owned()));
    let authed = gateway.get(endpoints.url(Endpoint::Orders)).await.unwrap();
    assert_eq!(authed.data, json!([]));

    gateway.credential().clear();
    let cleared = gateway.get(endpoints.url(Endpoint::Orders)).await;
    assert!(cleared.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_cookies_are_sent_back() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=cookie-1; Path=/")
                .set_body_json(json!({ "token": "t" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("cookie", "sid=cookie-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "c1" }])))
        .mount(&server)
        .await;

    gateway
        .post(endpoints.url(Endpoint::Login), json!({}))
        .await
        .unwrap();
    let resp = gateway.get(endpoints.url(Endpoint::Cart)).await.unwrap();
    assert_eq!(resp.data[0]["_id"], "c1");
}

// ── Multipart ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_multipart_upload() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("POST"))
        .and(path("/pets"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("rex.png"))
        .and(body_string_contains("Rex"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "petId": 3 })))
        .mount(&server)
        .await;

    let form = FormPayload::new()
        .text("name", "Rex")
        .attach(Attachment::new("image", "rex.png", vec![0x89u8, 0x50, 0x4e, 0x47]).with_mime("image/png"));

    let resp = gateway
        .post(endpoints.url(Endpoint::Pets), form)
        .await
        .unwrap();
    assert_eq!(resp.data["petId"], 3);
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_keeps_payload() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "server error" })),
        )
        .mount(&server)
        .await;

    let err = gateway
        .get(endpoints.url(Endpoint::Products))
        .await
        .unwrap_err();

    assert!(!err.is_network());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message(), Some("server error"));
}

#[tokio::test]
async fn test_server_error_without_json() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway.get(endpoints.url(Endpoint::Blogs)).await.unwrap_err();
    match err {
        Error::Server { status, payload } => {
            assert_eq!(status, 502);
            assert!(payload.is_none());
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let (server, gateway, endpoints) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = gateway.get(endpoints.url(Endpoint::Users)).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_network_failure_is_distinct() {
    let gateway = Gateway::new(&TransportConfig::default()).unwrap();
    let url = Url::parse("http://127.0.0.1:1/pets").unwrap();

    let err = gateway.get(url).await.unwrap_err();
    assert!(err.is_network(), "expected network error, got: {err:?}");
    assert!(err.payload().is_none());
}

// ── Interception ────────────────────────────────────────────────────

#[tokio::test]
async fn test_interceptor_sees_every_request() {
    let (server, gateway, endpoints) = setup().await;
    let recorder = Arc::new(RecordingInterceptor::default());
    let gateway = gateway.with_interceptor(recorder.clone());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    gateway.get(endpoints.url(Endpoint::Pets)).await.unwrap();
    gateway
        .put(endpoints.resource(Endpoint::Pets, &["1"]), json!({ "name": "Rex" }))
        .await
        .unwrap();

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["GET /pets".to_owned(), "PUT /pets/1".to_owned()]);
}
