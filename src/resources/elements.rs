//! Campaign element listing, creation, and resolution.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::{MergeFields, Object},
	lookup,
	resources::{self, Selector},
};

/// URL placement rules for an element.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUrl {
	/// Preview URL for the element.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub preview: Option<String>,
	/// URL masks for pages where the element should be present.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub includes: Option<Vec<String>>,
	/// URL masks for pages where the element must not appear; overrides `includes`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub excludes: Option<Vec<String>>,
}

/// Payload for creating a campaign element.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
	/// Element name; required and non-empty.
	pub name: String,
	/// Optional element description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// HTML node ID used for the element's content.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub element_id: Option<String>,
	/// Where the element is and is not present.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<ElementUrl>,
}
impl ElementDraft {
	/// Creates a draft with the required name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), description: None, element_id: None, url: None }
	}

	/// Adds a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the HTML node ID hosting the element's content.
	pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
		self.element_id = Some(element_id.into());

		self
	}

	/// Sets the URL placement rules.
	pub fn with_url(mut self, url: ElementUrl) -> Self {
		self.url = Some(url);

		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		resources::require("name", &self.name)
	}
}

/// Fully resolved element coordinates used to template variant URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedElement {
	/// Opaque site ID.
	pub site_id: String,
	/// Opaque campaign ID.
	pub campaign_id: String,
	/// Opaque element ID.
	pub id: String,
}

/// Facade over `/sites/{site}/sandbox/campaigns/{campaign}/elements`.
#[derive(Clone, Debug)]
pub struct Elements<'a> {
	pub(crate) client: &'a Client,
}
impl Elements<'_> {
	/// Lists the campaign's elements; every item carries the resolved `siteId` and
	/// `campaignId`.
	pub async fn list(&self, site: &Selector, campaign: &Selector) -> Result<Vec<Object>> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;

		self.list_resolved(&resolved.site_id, &resolved.id).await
	}

	/// Creates an element in the campaign.
	pub async fn create(
		&self,
		site: &Selector,
		campaign: &Selector,
		draft: ElementDraft,
	) -> Result<Object> {
		draft.validate()?;

		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let url = self.client.api_url(&[
			"sites",
			&resolved.site_id,
			"sandbox",
			"campaigns",
			&resolved.id,
			"elements",
		])?;

		self.client.dispatcher().post(url, &draft).await
	}

	/// Resolves site + campaign + element selectors to their opaque IDs.
	pub async fn resolve(
		&self,
		site: &Selector,
		campaign: &Selector,
		element: &Selector,
	) -> Result<ResolvedElement> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let id = match element {
			Selector::Id(id) => id.clone(),
			Selector::Name(_) => {
				let items = self.list_resolved(&resolved.site_id, &resolved.id).await?;
				let found = lookup::by_selector("element", &items, element)?;

				lookup::id_of("element", found)?
			},
		};

		Ok(ResolvedElement { site_id: resolved.site_id, campaign_id: resolved.id, id })
	}

	async fn list_resolved(&self, site_id: &str, campaign_id: &str) -> Result<Vec<Object>> {
		let url = self.client.api_url(&[
			"sites",
			site_id,
			"sandbox",
			"campaigns",
			campaign_id,
			"elements",
		])?;
		let merge = MergeFields::new().with("siteId", site_id).with("campaignId", campaign_id);

		self.client.dispatcher().get(url, Some(&merge)).await?.into_items()
	}
}
