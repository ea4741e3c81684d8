//! Site-level and campaign-level script management.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::{MergeFields, Object},
	lookup,
	resources::{self, Selector},
};

/// Payload for creating a campaign script.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDraft {
	/// Script name; required and non-empty.
	pub name: String,
	/// Optional script description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Script source; required and non-empty.
	pub content: String,
}
impl ScriptDraft {
	/// Creates a draft with the required name and source.
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self { name: name.into(), description: None, content: content.into() }
	}

	/// Adds a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		resources::require("name", &self.name)?;
		resources::require("content", &self.content)
	}
}

/// Partial update for an existing script; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPatch {
	/// Replacement name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Replacement source.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// Replacement API version tag (site-level scripts).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_version: Option<String>,
}

/// Facade over site-level and campaign-level script collections.
#[derive(Clone, Debug)]
pub struct Scripts<'a> {
	pub(crate) client: &'a Client,
}
impl Scripts<'_> {
	/// Lists the site's sandbox scripts.
	pub async fn list(&self, site: &Selector) -> Result<Vec<Object>> {
		let site_id = self.client.sites().resolve_id(site).await?;
		let url = self.client.api_url(&["sites", &site_id, "sandbox", "scripts"])?;

		self.client.dispatcher().get(url, None).await?.into_items()
	}

	/// Updates a site-level script referenced by ID or name.
	pub async fn update(
		&self,
		site: &Selector,
		script: &Selector,
		patch: ScriptPatch,
	) -> Result<Object> {
		let site_id = self.client.sites().resolve_id(site).await?;
		let script_id = match script {
			Selector::Id(id) => id.clone(),
			Selector::Name(_) => {
				let url = self.client.api_url(&["sites", &site_id, "sandbox", "scripts"])?;
				let items = self.client.dispatcher().get(url, None).await?.into_items()?;
				let found = lookup::by_selector("script", &items, script)?;

				lookup::id_of("script", found)?
			},
		};
		let url = self.client.api_url(&["sites", &site_id, "sandbox", "scripts", &script_id])?;

		self.client.dispatcher().put(url, &patch).await
	}

	/// Lists the campaign's scripts; every item carries the resolved `campaignId`.
	pub async fn list_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
	) -> Result<Vec<Object>> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;

		self.list_in_campaign_resolved(&resolved.site_id, &resolved.id).await
	}

	/// Creates a script in the campaign.
	pub async fn create_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
		draft: ScriptDraft,
	) -> Result<Object> {
		draft.validate()?;

		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let url = self.campaign_scripts_url(&resolved.site_id, &resolved.id, None)?;

		self.client.dispatcher().post(url, &draft).await
	}

	/// Updates a campaign script referenced by ID or name.
	pub async fn update_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
		script: &Selector,
		patch: ScriptPatch,
	) -> Result<Object> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let script_id = match script {
			Selector::Id(id) => id.clone(),
			Selector::Name(_) => {
				let items =
					self.list_in_campaign_resolved(&resolved.site_id, &resolved.id).await?;
				let found = lookup::by_selector("script", &items, script)?;

				lookup::id_of("script", found)?
			},
		};
		let url = self.campaign_scripts_url(&resolved.site_id, &resolved.id, Some(&script_id))?;

		self.client.dispatcher().put(url, &patch).await
	}

	async fn list_in_campaign_resolved(
		&self,
		site_id: &str,
		campaign_id: &str,
	) -> Result<Vec<Object>> {
		let url = self.campaign_scripts_url(site_id, campaign_id, None)?;
		let merge = MergeFields::new().with("campaignId", campaign_id);

		self.client.dispatcher().get(url, Some(&merge)).await?.into_items()
	}

	fn campaign_scripts_url(
		&self,
		site_id: &str,
		campaign_id: &str,
		script_id: Option<&str>,
	) -> Result<Url> {
		let mut segments = vec!["sites", site_id, "sandbox", "campaigns", campaign_id, "scripts"];

		if let Some(script_id) = script_id {
			segments.push(script_id);
		}

		self.client.api_url(&segments)
	}
}
