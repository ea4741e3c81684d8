//! Client-level error types shared across the authorizer, dispatcher, and facades.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint rejected the credential exchange.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Response or request body could not be encoded/decoded.
	#[error(transparent)]
	Payload(#[from] PayloadError),
	/// Transport failure (DNS, TCP, TLS, non-2xx status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Facade-level input validation failure, raised before any network call.
	#[error(transparent)]
	Validation(#[from] ValidationError),
}

/// Protocol-level rejection returned by the OAuth2 token endpoint.
#[derive(Debug, ThisError)]
#[error("Authorization failed ({kind}): {description}.")]
pub struct AuthorizationError {
	/// Which rejection the server reported.
	pub kind: AuthorizationErrorKind,
	/// Server-provided `error_description`, verbatim.
	pub description: String,
	/// Status code reported in the error body or on the response, when available.
	pub status: Option<u16>,
}

/// Rejection kinds the token endpoint is known to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthorizationErrorKind {
	/// Missing or incorrect Basic `Authorization` header.
	InvalidClient,
	/// Malformed body or missing/unsupported grant type.
	InvalidRequest,
	/// Bad resource-owner username/password.
	InvalidGrant,
	/// Error string outside the documented set; kept inspectable instead of dropped.
	Other,
}
impl AuthorizationErrorKind {
	/// Maps the wire-level `error` string onto a kind.
	pub fn from_wire(error: &str) -> Self {
		match error {
			"invalid_client" => Self::InvalidClient,
			"invalid_request" => Self::InvalidRequest,
			"invalid_grant" => Self::InvalidGrant,
			_ => Self::Other,
		}
	}

	/// Returns a stable label suitable for logs and assertions.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InvalidClient => "invalid_client",
			Self::InvalidRequest => "invalid_request",
			Self::InvalidGrant => "invalid_grant",
			Self::Other => "other",
		}
	}
}
impl Display for AuthorizationErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and construction failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint URLs must use HTTPS unless insecure endpoints are explicitly allowed.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint URL cannot carry path segments (e.g. `data:` URLs).
	#[error("Endpoint URL cannot be extended with path segments: {url}.")]
	UnsupportedBase {
		/// Base URL that rejected segment extension.
		url: String,
	},
	/// Builder was finalized without credentials.
	#[error("Credentials are required to build a client.")]
	MissingCredentials,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Body encode/decode failures.
#[derive(Debug, ThisError)]
pub enum PayloadError {
	/// Response body was not valid JSON for the expected shape.
	#[error("Response body is malformed JSON.")]
	Json {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response, when available.
		status: Option<u16>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body decoded but did not have the shape the operation requires.
	#[error("Response body has an unexpected shape; expected {expected}.")]
	UnexpectedShape {
		/// Description of the shape the caller expected.
		expected: String,
	},
}

/// Transport-level failures (network, IO, non-2xx status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Server answered with a non-success status; the body is passed through unchanged.
	#[error("API responded with status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded for inspection.
		body: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}

/// Facade input validation failures, surfaced before any network call.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required identifying field was empty or absent.
	#[error("`{field}` must be provided.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// Name/ID resolution found no matching entity in the listed collection.
	#[error("No {entity} matches `{key}`.")]
	UnknownEntity {
		/// Entity kind being resolved (site, campaign, ...).
		entity: &'static str,
		/// Identifier or name that failed to resolve.
		key: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authorization_error_kind_maps_wire_strings() {
		assert_eq!(
			AuthorizationErrorKind::from_wire("invalid_client"),
			AuthorizationErrorKind::InvalidClient
		);
		assert_eq!(
			AuthorizationErrorKind::from_wire("invalid_request"),
			AuthorizationErrorKind::InvalidRequest
		);
		assert_eq!(
			AuthorizationErrorKind::from_wire("invalid_grant"),
			AuthorizationErrorKind::InvalidGrant
		);
		assert_eq!(
			AuthorizationErrorKind::from_wire("server_error"),
			AuthorizationErrorKind::Other
		);
	}

	#[test]
	fn authorization_error_display_includes_description() {
		let err = AuthorizationError {
			kind: AuthorizationErrorKind::InvalidGrant,
			description: "Invalid resource owner credentials".into(),
			status: Some(400),
		};

		assert_eq!(
			err.to_string(),
			"Authorization failed (invalid_grant): Invalid resource owner credentials."
		);
	}
}
