//! Throttled request dispatch with bearer attachment and response normalization.
//!
//! Every dispatch authorizes first, waits its turn on the shared [`Throttle`], then sends
//! with `Authorization: Bearer <token>`. GET responses are normalized: a body carrying an
//! `items` array resolves to the list, with optional contextual [`MergeFields`] merged
//! into every element so callers don't need a second round trip; a plain object body is
//! merged the same way. POST/PUT resolve with the raw body. Errors pass through
//! unchanged—no retries in this layer—except that a 401 drops the cached token so the
//! next dispatch re-authorizes.

// crates.io
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSource,
	error::{PayloadError, TransportError},
	http::{self, HttpTransport},
	obs::{OpKind, OpSpan},
	throttle::Throttle,
};

/// Decoded JSON object returned by the API.
pub type Object = serde_json::Map<String, Value>;

/// Contextual key/value pairs merged into normalized GET results.
///
/// Typically carries resolved parent IDs (`siteId`, `campaignId`) so returned entities
/// are self-describing.
#[derive(Clone, Debug, Default)]
pub struct MergeFields(BTreeMap<String, Value>);
impl MergeFields {
	/// Creates an empty field set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a field to merge into every result entity.
	pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(field.into(), value.into());

		self
	}

	/// Returns `true` when no fields would be merged.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn apply(&self, object: &mut Object) {
		for (field, value) in &self.0 {
			object.insert(field.clone(), value.clone());
		}
	}
}

/// Normalized result of a GET dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// Body carried an `items` array; resolved to the list itself.
	Items(Vec<Object>),
	/// Body was a single object.
	Object(Object),
}
impl Payload {
	/// Unwraps the list variant, rejecting single-object bodies.
	pub fn into_items(self) -> Result<Vec<Object>> {
		match self {
			Self::Items(items) => Ok(items),
			Self::Object(_) =>
				Err(PayloadError::UnexpectedShape { expected: "a body with an `items` array".into() }
					.into()),
		}
	}

	/// Unwraps the single-object variant, rejecting list bodies.
	pub fn into_object(self) -> Result<Object> {
		match self {
			Self::Object(object) => Ok(object),
			Self::Items(_) =>
				Err(PayloadError::UnexpectedShape { expected: "a single-object body".into() }.into()),
		}
	}
}

/// Throttled dispatcher that authorizes, paces, and normalizes API calls.
pub struct Dispatcher {
	transport: HttpTransport,
	token_source: Arc<dyn TokenSource>,
	throttle: Throttle,
}
impl Dispatcher {
	/// Creates a dispatcher with the default throttle interval.
	pub fn new(transport: HttpTransport, token_source: Arc<dyn TokenSource>) -> Self {
		Self::with_throttle(transport, token_source, Throttle::default())
	}

	/// Creates a dispatcher with a caller-provided throttle.
	pub fn with_throttle(
		transport: HttpTransport,
		token_source: Arc<dyn TokenSource>,
		throttle: Throttle,
	) -> Self {
		Self { transport, token_source, throttle }
	}

	/// Dispatches a GET and normalizes the response body.
	pub async fn get(&self, url: Url, merge: Option<&MergeFields>) -> Result<Payload> {
		let object = self.send(OpKind::Get, Method::GET, url, None::<&()>).await?;

		normalize(object, merge)
	}

	/// Dispatches a POST and resolves with the raw response body.
	pub async fn post<T>(&self, url: Url, body: &T) -> Result<Object>
	where
		T: ?Sized + Serialize,
	{
		self.send(OpKind::Post, Method::POST, url, Some(body)).await
	}

	/// Dispatches a PUT and resolves with the raw response body.
	pub async fn put<T>(&self, url: Url, body: &T) -> Result<Object>
	where
		T: ?Sized + Serialize,
	{
		self.send(OpKind::Put, Method::PUT, url, Some(body)).await
	}

	async fn send<T>(
		&self,
		kind: OpKind,
		method: Method,
		url: Url,
		body: Option<&T>,
	) -> Result<Object>
	where
		T: ?Sized + Serialize,
	{
		let span = OpSpan::new(kind, "dispatch");

		span.instrument(async move {
			let token = self.token_source.authorize().await?;

			self.throttle.pace().await;

			let mut request = self.transport.request(method, url).bearer_auth(&token);

			if let Some(body) = body {
				let encoded =
					serde_json::to_vec(body).map_err(|source| PayloadError::Encode { source })?;

				request = request
					.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
					.body(encoded);
			}

			let response = request.send().await.map_err(TransportError::from)?;
			let status = response.status();
			let bytes = response.bytes().await.map_err(TransportError::from)?;

			if !status.is_success() {
				// Stale or rejected token; drop it so the next dispatch re-authorizes.
				if status.as_u16() == 401 {
					self.token_source.invalidate();
				}

				return Err(TransportError::Status {
					status: status.as_u16(),
					body: String::from_utf8_lossy(&bytes).into_owned(),
				}
				.into());
			}

			http::decode_json::<Object>(&bytes, Some(status.as_u16()))
		})
		.await
	}
}
impl Debug for Dispatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher").field("throttle", &self.throttle).finish()
	}
}

fn normalize(mut object: Object, merge: Option<&MergeFields>) -> Result<Payload> {
	match object.remove("items") {
		Some(Value::Array(values)) => {
			let mut items = Vec::with_capacity(values.len());

			for value in values {
				match value {
					Value::Object(mut item) => {
						if let Some(fields) = merge {
							fields.apply(&mut item);
						}

						items.push(item);
					},
					_ =>
						return Err(PayloadError::UnexpectedShape {
							expected: "an object for every entry of `items`".into(),
						}
						.into()),
				}
			}

			Ok(Payload::Items(items))
		},
		Some(other) => {
			// A non-array `items` field is plain data, not a collection marker.
			object.insert("items".into(), other);

			if let Some(fields) = merge {
				fields.apply(&mut object);
			}

			Ok(Payload::Object(object))
		},
		None => {
			if let Some(fields) = merge {
				fields.apply(&mut object);
			}

			Ok(Payload::Object(object))
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn object(raw: &str) -> Object {
		serde_json::from_str(raw).expect("Test fixture should decode.")
	}

	#[test]
	fn normalize_resolves_items_and_merges_fields() {
		let body = object(r#"{"items":[{"a":1}]}"#);
		let merge = MergeFields::new().with("siteId", "S");
		let payload =
			normalize(body, Some(&merge)).expect("Normalization should succeed for item lists.");

		assert_eq!(payload, Payload::Items(vec![object(r#"{"a":1,"siteId":"S"}"#)]));
	}

	#[test]
	fn normalize_passes_single_objects_through_unchanged() {
		let body = object(r#"{"x":1}"#);
		let payload = normalize(body.clone(), None)
			.expect("Normalization should succeed for single objects.");

		assert_eq!(payload, Payload::Object(body));
	}

	#[test]
	fn normalize_merges_fields_into_single_objects() {
		let body = object(r#"{"x":1}"#);
		let merge = MergeFields::new().with("campaignId", "C");
		let payload =
			normalize(body, Some(&merge)).expect("Normalization should succeed with merge fields.");

		assert_eq!(payload, Payload::Object(object(r#"{"x":1,"campaignId":"C"}"#)));
	}

	#[test]
	fn normalize_keeps_non_array_items_field() {
		let body = object(r#"{"items":3,"x":1}"#);
		let payload = normalize(body.clone(), None)
			.expect("Normalization should succeed for scalar `items` fields.");

		assert_eq!(payload, Payload::Object(body));
	}

	#[test]
	fn normalize_rejects_non_object_entries() {
		let body = object(r#"{"items":[1]}"#);
		let err = normalize(body, None).expect_err("Non-object entries should be rejected.");

		assert!(matches!(err, Error::Payload(PayloadError::UnexpectedShape { .. })));
	}

	#[test]
	fn payload_unwrap_helpers_enforce_shape() {
		let items = Payload::Items(Vec::new());
		let single = Payload::Object(Object::new());

		assert!(items.clone().into_items().is_ok());
		assert!(items.into_object().is_err());
		assert!(single.clone().into_object().is_ok());
		assert!(single.into_items().is_err());
	}
}
