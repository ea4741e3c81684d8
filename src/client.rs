//! Client construction and the facade entry points.

// self
use crate::{
	_prelude::*,
	auth::{Authorizer, Credentials},
	dispatch::Dispatcher,
	error::ConfigError,
	http::{self, HttpTransport},
	resources::{
		actions::Actions, campaigns::Campaigns, elements::Elements, scripts::Scripts, sites::Sites,
		variants::Variants,
	},
	throttle::Throttle,
};

/// Default authorization base URL (US region).
pub const DEFAULT_AUTH_BASE: &str = "https://api-auth-us.maxymiser.com/oauth2/v1";
/// Default API base URL (US region).
pub const DEFAULT_API_BASE: &str = "https://api-us.maxymiser.com/v1";

/// Builder for [`Client`] values.
#[derive(Debug, Default)]
pub struct ClientBuilder {
	auth_base: Option<Url>,
	api_base: Option<Url>,
	credentials: Option<Credentials>,
	min_interval: Option<Duration>,
	http_client: Option<ReqwestClient>,
	allow_insecure_endpoints: bool,
}
impl ClientBuilder {
	/// Creates a builder seeded with the vendor's default US endpoints.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the authorization base URL.
	pub fn auth_base(mut self, url: Url) -> Self {
		self.auth_base = Some(url);

		self
	}

	/// Overrides the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Sets the credentials used for the password grant.
	pub fn credentials(mut self, credentials: Credentials) -> Self {
		self.credentials = Some(credentials);

		self
	}

	/// Overrides the minimum spacing between dispatched requests.
	pub fn min_interval(mut self, interval: Duration) -> Self {
		self.min_interval = Some(interval);

		self
	}

	/// Supplies a preconfigured [`ReqwestClient`] instead of building one.
	pub fn http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Permits non-HTTPS endpoints; intended for local mock servers only.
	pub fn allow_insecure_endpoints(mut self, allow: bool) -> Self {
		self.allow_insecure_endpoints = allow;

		self
	}

	/// Consumes the builder and assembles the authorizer + dispatcher pair.
	pub fn build(self) -> Result<Client> {
		let auth_base = parse_base(self.auth_base, DEFAULT_AUTH_BASE)?;
		let api_base = parse_base(self.api_base, DEFAULT_API_BASE)?;

		if !self.allow_insecure_endpoints {
			validate_endpoint("authorization", &auth_base)?;
			validate_endpoint("api", &api_base)?;
		}

		let credentials = self.credentials.ok_or(ConfigError::MissingCredentials)?;
		let transport = match self.http_client {
			Some(client) => HttpTransport::with_client(client),
			None => HttpTransport::with_client(
				ReqwestClient::builder().build().map_err(ConfigError::from)?,
			),
		};
		let authorizer = Authorizer::new(transport.clone(), &auth_base, credentials)?;
		let throttle =
			Throttle::new(self.min_interval.unwrap_or(Throttle::DEFAULT_MIN_INTERVAL));
		let dispatcher = Dispatcher::with_throttle(transport, Arc::new(authorizer), throttle);

		Ok(Client { api_base, dispatcher: Arc::new(dispatcher) })
	}
}

/// Entry point bundling the core with per-entity facades.
#[derive(Clone)]
pub struct Client {
	api_base: Url,
	dispatcher: Arc<Dispatcher>,
}
impl Client {
	/// Returns a builder seeded with the vendor's default US endpoints.
	pub fn builder() -> ClientBuilder {
		ClientBuilder::new()
	}

	/// Raw access to the throttled dispatcher.
	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Returns the configured API base URL.
	pub fn api_base(&self) -> &Url {
		&self.api_base
	}

	/// Sites facade.
	pub fn sites(&self) -> Sites<'_> {
		Sites { client: self }
	}

	/// Campaigns facade.
	pub fn campaigns(&self) -> Campaigns<'_> {
		Campaigns { client: self }
	}

	/// Elements facade.
	pub fn elements(&self) -> Elements<'_> {
		Elements { client: self }
	}

	/// Variants facade.
	pub fn variants(&self) -> Variants<'_> {
		Variants { client: self }
	}

	/// Scripts facade (site- and campaign-level).
	pub fn scripts(&self) -> Scripts<'_> {
		Scripts { client: self }
	}

	/// Actions facade (site- and campaign-level).
	pub fn actions(&self) -> Actions<'_> {
		Actions { client: self }
	}

	pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
		Ok(http::join_segments(&self.api_base, segments)?)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("api_base", &self.api_base.as_str()).finish()
	}
}

fn parse_base(configured: Option<Url>, default: &str) -> Result<Url> {
	match configured {
		Some(url) => Ok(url),
		None => Url::parse(default).map_err(|source| ConfigError::InvalidUrl { source }.into()),
	}
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<()> {
	if url.scheme() == "https" {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() }.into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ValidationError;

	fn credentials() -> Credentials {
		Credentials::new("clientId", "clientSecret", "username", "password")
	}

	#[test]
	fn builder_requires_credentials() {
		let err = Client::builder().build().expect_err("Credentials should be mandatory.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCredentials)));
	}

	#[test]
	fn builder_rejects_insecure_endpoints_by_default() {
		let err = Client::builder()
			.credentials(credentials())
			.api_base(Url::parse("http://localhost:1234/v1").expect("Test URL should parse."))
			.build()
			.expect_err("Plain HTTP endpoints should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InsecureEndpoint { endpoint: "api", .. })));
	}

	#[test]
	fn builder_defaults_to_vendor_endpoints() {
		let client = Client::builder()
			.credentials(credentials())
			.build()
			.expect("Default endpoints should build.");

		assert_eq!(client.api_base().as_str(), DEFAULT_API_BASE);
	}

	#[tokio::test]
	async fn drafts_validate_before_any_network_call() {
		let client = Client::builder()
			.credentials(credentials())
			.build()
			.expect("Default endpoints should build.");
		let err = client
			.campaigns()
			.create(
				&crate::resources::Selector::id("MzIxMzM"),
				crate::resources::campaigns::CampaignDraft::new(""),
			)
			.await
			.expect_err("Empty names should be rejected before dispatch.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::MissingField { field: "name" })
		));
	}
}
