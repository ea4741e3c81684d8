//! Sandbox campaign listing, creation, and name resolution.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::{MergeFields, Object},
	lookup,
	resources::{self, Selector},
};

/// Payload for creating a sandbox campaign.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
	/// Campaign name; required and non-empty.
	pub name: String,
	/// Optional campaign description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl CampaignDraft {
	/// Creates a draft with the required name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), description: None }
	}

	/// Adds a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		resources::require("name", &self.name)
	}
}

/// Fully resolved campaign coordinates used to template child-entity URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCampaign {
	/// Opaque site ID the campaign belongs to.
	pub site_id: String,
	/// Opaque campaign ID.
	pub id: String,
}

/// Facade over `/sites/{site}/sandbox/campaigns`.
#[derive(Clone, Debug)]
pub struct Campaigns<'a> {
	pub(crate) client: &'a Client,
}
impl Campaigns<'_> {
	/// Lists the site's sandbox campaigns; every item carries the resolved `siteId`.
	pub async fn list(&self, site: &Selector) -> Result<Vec<Object>> {
		let site_id = self.client.sites().resolve_id(site).await?;

		self.list_by_site_id(&site_id).await
	}

	/// Creates a sandbox campaign for the site.
	pub async fn create(&self, site: &Selector, draft: CampaignDraft) -> Result<Object> {
		draft.validate()?;

		let site_id = self.client.sites().resolve_id(site).await?;
		let url = self.client.api_url(&["sites", &site_id, "sandbox", "campaigns"])?;

		self.client.dispatcher().post(url, &draft).await
	}

	/// Resolves site + campaign selectors to their opaque IDs.
	pub async fn resolve(&self, site: &Selector, campaign: &Selector) -> Result<ResolvedCampaign> {
		let site_id = self.client.sites().resolve_id(site).await?;
		let items = self.list_by_site_id(&site_id).await?;
		let found = lookup::by_selector("campaign", &items, campaign)?;

		Ok(ResolvedCampaign { site_id, id: lookup::id_of("campaign", found)? })
	}

	async fn list_by_site_id(&self, site_id: &str) -> Result<Vec<Object>> {
		let url = self.client.api_url(&["sites", site_id, "sandbox", "campaigns"])?;
		let merge = MergeFields::new().with("siteId", site_id);

		self.client.dispatcher().get(url, Some(&merge)).await?.into_items()
	}
}
