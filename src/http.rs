//! Transport primitives shared by the authorizer and the dispatcher.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The authorizer and the dispatcher clone the same transport, so connection pooling
/// and TLS configuration are decided once at client construction.
#[derive(Clone, Default)]
pub struct HttpTransport(pub ReqwestClient);
impl HttpTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for HttpTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for HttpTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("HttpTransport(..)")
	}
}

/// Decodes a JSON body into `T`, attaching the offending path and HTTP status on failure.
pub(crate) fn decode_json<T>(bytes: &[u8], status: Option<u16>) -> Result<T>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| crate::error::PayloadError::Json { source, status }.into())
}

/// Extends a base URL with encoded path segments.
///
/// `Url::join` resolves relative references and silently drops the base's last path
/// segment when it lacks a trailing slash, so endpoint URLs are built by pushing
/// segments instead.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	{
		let mut path = url
			.path_segments_mut()
			.map_err(|()| ConfigError::UnsupportedBase { url: base.to_string() })?;

		path.pop_if_empty();

		for segment in segments {
			path.push(segment);
		}
	}

	Ok(url)
}
