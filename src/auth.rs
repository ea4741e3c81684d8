//! OAuth2 password-grant token lifecycle: acquisition, caching, and singleflight
//! coordination.
//!
//! The [`Authorizer`] owns the only mutable authorization state in the crate: one cached
//! bearer token and one in-flight acquisition at a time. Concurrent callers serialize on
//! an async mutex and re-check the cache under the lock, so N overlapping
//! [`Authorizer::authorize`] calls produce exactly one token request and observe the same
//! token. A failed acquisition caches nothing; the next call retries.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	error::{AuthorizationError, AuthorizationErrorKind, TransportError},
	http::{self, HttpTransport},
	obs::{OpKind, OpSpan},
};

/// Boxed future returned by [`TokenSource::authorize`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Token provider contract consumed by the dispatcher.
///
/// The dispatcher depends on this trait instead of [`Authorizer`] directly so tests and
/// embedders can substitute their own token sources.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Resolves the current bearer token, acquiring one if necessary.
	fn authorize(&self) -> TokenFuture<'_>;

	/// Drops the cached token so the next [`TokenSource::authorize`] call re-acquires.
	fn invalidate(&self);
}

/// Opaque secret wrapper that redacts its value in debug output.
#[derive(Clone)]
pub struct Secret(String);
impl Secret {
	/// Wraps a secret value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the underlying secret; callers must avoid logging it.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable credential set supplied once at client construction.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth2 client identifier, sent in the Basic `Authorization` header.
	pub client_id: String,
	/// OAuth2 client secret, sent in the Basic `Authorization` header.
	pub client_secret: Secret,
	/// Resource-owner username for the password grant.
	pub username: String,
	/// Resource-owner password for the password grant.
	pub password: Secret,
}
impl Credentials {
	/// Creates a credential set for the password grant.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			username: username.into(),
			password: Secret::new(password),
		}
	}

	fn basic_header(&self) -> String {
		let raw = format!("{}:{}", self.client_id, self.client_secret.expose());

		format!("Basic {}", STANDARD.encode(raw))
	}
}

/// Owns the OAuth2 token lifecycle for one client instance.
///
/// No hidden process-wide state: independent clients (and tests) each construct their own
/// authorizer and cache.
pub struct Authorizer {
	transport: HttpTransport,
	token_endpoint: Url,
	credentials: Credentials,
	cached: RwLock<Option<String>>,
	acquire_guard: AsyncMutex<()>,
}
impl Authorizer {
	/// Creates an authorizer for the provided auth base URL and credentials.
	///
	/// The token endpoint is `{auth_base}/tokens`.
	pub fn new(transport: HttpTransport, auth_base: &Url, credentials: Credentials) -> Result<Self> {
		let token_endpoint = http::join_segments(auth_base, &["tokens"])?;

		Ok(Self {
			transport,
			token_endpoint,
			credentials,
			cached: RwLock::new(None),
			acquire_guard: AsyncMutex::new(()),
		})
	}

	/// Resolves the cached bearer token, acquiring one from the token endpoint if needed.
	pub async fn authorize(&self) -> Result<String> {
		if let Some(token) = self.cached.read().clone() {
			return Ok(token);
		}

		let span = OpSpan::new(OpKind::Authorize, "acquire");

		span.instrument(async {
			let _singleflight = self.acquire_guard.lock().await;

			// A concurrent caller may have populated the cache while this one waited.
			if let Some(token) = self.cached.read().clone() {
				return Ok(token);
			}

			let token = self.request_token().await?;

			*self.cached.write() = Some(token.clone());

			Ok(token)
		})
		.await
	}

	/// Drops the cached token so the next call re-acquires.
	pub fn invalidate(&self) {
		*self.cached.write() = None;
	}

	async fn request_token(&self) -> Result<String> {
		let form = [
			("grant_type", "password"),
			("username", self.credentials.username.as_str()),
			("password", self.credentials.password.expose()),
		];
		let response = self
			.transport
			.post(self.token_endpoint.clone())
			.header(AUTHORIZATION, self.credentials.basic_header())
			.form(&form)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?;
		let body = match http::decode_json::<TokenEndpointBody>(&bytes, Some(status.as_u16())) {
			Ok(body) => body,
			// The endpoint reports protocol rejections in the body; anything that decodes as
			// neither shape on a non-2xx response is a plain transport failure.
			Err(decode_err) =>
				if status.is_success() {
					return Err(decode_err);
				} else {
					return Err(TransportError::Status {
						status: status.as_u16(),
						body: String::from_utf8_lossy(&bytes).into_owned(),
					}
					.into());
				},
		};

		match body {
			TokenEndpointBody::Issued { access_token } => Ok(access_token),
			TokenEndpointBody::Denied { error, error_description, status_code } =>
				Err(AuthorizationError {
					kind: AuthorizationErrorKind::from_wire(&error),
					description: error_description.unwrap_or_default(),
					status: status_code.or(Some(status.as_u16())),
				}
				.into()),
		}
	}
}
impl TokenSource for Authorizer {
	fn authorize(&self) -> TokenFuture<'_> {
		Box::pin(Authorizer::authorize(self))
	}

	fn invalidate(&self) {
		Authorizer::invalidate(self);
	}
}
impl Debug for Authorizer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authorizer")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("client_id", &self.credentials.client_id)
			.field("cached", &self.cached.read().is_some())
			.finish()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenEndpointBody {
	Issued {
		access_token: String,
	},
	Denied {
		error: String,
		error_description: Option<String>,
		#[serde(rename = "statusCode")]
		status_code: Option<u16>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn credentials() -> Credentials {
		Credentials::new("clientId", "clientSecret", "username", "password")
	}

	#[test]
	fn basic_header_encodes_client_pair() {
		assert_eq!(credentials().basic_header(), "Basic Y2xpZW50SWQ6Y2xpZW50U2VjcmV0");
	}

	#[test]
	fn secrets_are_redacted_in_debug_output() {
		let rendered = format!("{:?}", credentials());

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("clientSecret"));
		assert!(!rendered.contains("\"password\""));
	}

	#[test]
	fn token_endpoint_body_decodes_both_shapes() {
		let issued: TokenEndpointBody =
			serde_json::from_str(r#"{"access_token":"eyJhbGciOiJSUzjFfb_FkJFoIdA"}"#)
				.expect("Issued body should decode.");

		assert!(matches!(issued, TokenEndpointBody::Issued { access_token } if access_token == "eyJhbGciOiJSUzjFfb_FkJFoIdA"));

		let denied: TokenEndpointBody = serde_json::from_str(
			r#"{"error":"invalid_grant","statusCode":400,"error_description":"Invalid resource owner credentials"}"#,
		)
		.expect("Denied body should decode.");

		assert!(matches!(
			denied,
			TokenEndpointBody::Denied { error, error_description: Some(desc), status_code: Some(400) }
				if error == "invalid_grant" && desc == "Invalid resource owner credentials"
		));
	}
}
