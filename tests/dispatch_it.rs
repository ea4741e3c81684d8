// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use maxymiser_api::{
	auth::{TokenFuture, TokenSource},
	dispatch::{Dispatcher, MergeFields, Object, Payload},
	error::{Error, TransportError},
	http::HttpTransport,
	throttle::Throttle,
};

/// Fixed-token source standing in for the authorizer at the dispatcher boundary.
struct StaticTokenSource {
	invalidated: AtomicBool,
}
impl StaticTokenSource {
	fn new() -> Arc<Self> {
		Arc::new(Self { invalidated: AtomicBool::new(false) })
	}
}
impl TokenSource for StaticTokenSource {
	fn authorize(&self) -> TokenFuture<'_> {
		Box::pin(async { Ok("test-token".into()) })
	}

	fn invalidate(&self) {
		self.invalidated.store(true, Ordering::SeqCst);
	}
}

fn build_dispatcher(source: Arc<StaticTokenSource>) -> Dispatcher {
	Dispatcher::with_throttle(HttpTransport::default(), source, Throttle::new(Duration::ZERO))
}

fn url_of(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock URL should parse.")
}

fn objects(value: serde_json::Value) -> Vec<Object> {
	serde_json::from_value(value).expect("Test fixture should decode.")
}

#[tokio::test]
async fn get_resolves_items_and_merges_contextual_fields() {
	let server = MockServer::start_async().await;
	let dispatcher = build_dispatcher(StaticTokenSource::new());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/elements").header("authorization", "Bearer test-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"items\":[{\"a\":1}]}");
		})
		.await;
	let merge = MergeFields::new().with("siteId", "S");
	let payload = dispatcher
		.get(url_of(&server, "/v1/elements"), Some(&merge))
		.await
		.expect("GET dispatch should succeed.");

	assert_eq!(payload, Payload::Items(objects(json!([{"a": 1, "siteId": "S"}]))));
}

#[tokio::test]
async fn get_passes_single_objects_through_unchanged() {
	let server = MockServer::start_async().await;
	let dispatcher = build_dispatcher(StaticTokenSource::new());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/site");
			then.status(200).header("content-type", "application/json").body("{\"x\":1}");
		})
		.await;
	let payload = dispatcher
		.get(url_of(&server, "/v1/site"), None)
		.await
		.expect("GET dispatch should succeed.");

	assert_eq!(
		payload.into_object().expect("Single-object bodies should normalize to an object."),
		objects(json!([{"x": 1}])).remove(0)
	);
}

#[tokio::test]
async fn post_sends_json_and_resolves_the_raw_body() {
	let server = MockServer::start_async().await;
	let dispatcher = build_dispatcher(StaticTokenSource::new());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/campaigns")
				.header("authorization", "Bearer test-token")
				.header("content-type", "application/json")
				.json_body(json!({"name": "My campaign"}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"MDA2MjYx\",\"name\":\"My campaign\"}");
		})
		.await;
	let body = dispatcher
		.post(url_of(&server, "/v1/campaigns"), &json!({"name": "My campaign"}))
		.await
		.expect("POST dispatch should succeed.");

	assert_eq!(body, objects(json!([{"id": "MDA2MjYx", "name": "My campaign"}])).remove(0));

	mock.assert_async().await;
}

#[tokio::test]
async fn put_sends_json_and_resolves_the_raw_body() {
	let server = MockServer::start_async().await;
	let dispatcher = build_dispatcher(StaticTokenSource::new());
	let mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/v1/actions/NDMyNDMy")
				.json_body(json!({"isPrimary": false}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"NDMyNDMy\",\"isPrimary\":false}");
		})
		.await;
	let body = dispatcher
		.put(url_of(&server, "/v1/actions/NDMyNDMy"), &json!({"isPrimary": false}))
		.await
		.expect("PUT dispatch should succeed.");

	assert_eq!(body.get("isPrimary"), Some(&json!(false)));

	mock.assert_async().await;
}

#[tokio::test]
async fn non_success_statuses_pass_through_as_transport_errors() {
	let server = MockServer::start_async().await;
	let source = StaticTokenSource::new();
	let dispatcher = build_dispatcher(source.clone());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/sites");
			then.status(500).body("boom");
		})
		.await;
	let err = dispatcher
		.get(url_of(&server, "/v1/sites"), None)
		.await
		.expect_err("Server failures should surface to the caller.");

	match err {
		Error::Transport(TransportError::Status { status, body }) => {
			assert_eq!(status, 500);
			assert_eq!(body, "boom");
		},
		other => panic!("Expected a status error, got: {other:?}"),
	}

	assert!(!source.invalidated.load(Ordering::SeqCst));
}

#[tokio::test]
async fn unauthorized_responses_invalidate_the_token_source() {
	let server = MockServer::start_async().await;
	let source = StaticTokenSource::new();
	let dispatcher = build_dispatcher(source.clone());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/sites");
			then.status(401).body("{\"error\":\"unauthorized\"}");
		})
		.await;
	let err = dispatcher
		.get(url_of(&server, "/v1/sites"), None)
		.await
		.expect_err("Unauthorized responses should surface to the caller.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 401, .. })));
	assert!(source.invalidated.load(Ordering::SeqCst));
}
