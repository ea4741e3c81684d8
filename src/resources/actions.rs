//! Site-level and campaign-level action management.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::{MergeFields, Object},
	lookup,
	resources::{self, Selector},
};

/// Payload for creating a campaign action.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDraft {
	/// Action name; required and non-empty.
	pub name: String,
	/// Action type (e.g. `Click_through`, `Page_Impressions`, `Sales_Amount`).
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Optional action description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Script snippet that reports the action.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script_content: Option<String>,
	/// Marks the action as the campaign's primary metric.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_primary: Option<bool>,
	/// ISO currency code for monetary actions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// Value multiplier for monetary actions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub multiplier: Option<f64>,
}
impl ActionDraft {
	/// Creates a draft with the required name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: None,
			description: None,
			script_content: None,
			is_primary: None,
			currency: None,
			multiplier: None,
		}
	}

	/// Sets the action type.
	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());

		self
	}

	/// Adds a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the reporting script snippet.
	pub fn with_script_content(mut self, script_content: impl Into<String>) -> Self {
		self.script_content = Some(script_content.into());

		self
	}

	/// Marks the action as the campaign's primary metric.
	pub fn with_is_primary(mut self, is_primary: bool) -> Self {
		self.is_primary = Some(is_primary);

		self
	}

	/// Sets the currency code for monetary actions.
	pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = Some(currency.into());

		self
	}

	/// Sets the value multiplier for monetary actions.
	pub fn with_multiplier(mut self, multiplier: f64) -> Self {
		self.multiplier = Some(multiplier);

		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		resources::require("name", &self.name)
	}
}

/// Partial update for an existing action; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPatch {
	/// Replacement name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement action type.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Replacement reporting script snippet.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script_content: Option<String>,
	/// Replacement primary-metric flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_primary: Option<bool>,
	/// Replacement currency code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// Replacement value multiplier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub multiplier: Option<f64>,
}
impl ActionPatch {
	/// Creates an empty patch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the primary-metric flag.
	pub fn with_is_primary(mut self, is_primary: bool) -> Self {
		self.is_primary = Some(is_primary);

		self
	}
}

/// Facade over site-level and campaign-level action collections.
#[derive(Clone, Debug)]
pub struct Actions<'a> {
	pub(crate) client: &'a Client,
}
impl Actions<'_> {
	/// Lists the site's sandbox actions.
	pub async fn list(&self, site: &Selector) -> Result<Vec<Object>> {
		let site_id = self.client.sites().resolve_id(site).await?;
		let url = self.client.api_url(&["sites", &site_id, "sandbox", "actions"])?;

		self.client.dispatcher().get(url, None).await?.into_items()
	}

	/// Lists the campaign's actions; every item carries the resolved `campaignId`.
	pub async fn list_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
	) -> Result<Vec<Object>> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;

		self.list_in_campaign_resolved(&resolved.site_id, &resolved.id).await
	}

	/// Creates an action in the campaign.
	pub async fn create_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
		draft: ActionDraft,
	) -> Result<Object> {
		draft.validate()?;

		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let url = self.campaign_actions_url(&resolved.site_id, &resolved.id, None)?;

		self.client.dispatcher().post(url, &draft).await
	}

	/// Updates a campaign action referenced by ID or name.
	pub async fn update_in_campaign(
		&self,
		site: &Selector,
		campaign: &Selector,
		action: &Selector,
		patch: ActionPatch,
	) -> Result<Object> {
		let resolved = self.client.campaigns().resolve(site, campaign).await?;
		let action_id = match action {
			Selector::Id(id) => id.clone(),
			Selector::Name(_) => {
				let items =
					self.list_in_campaign_resolved(&resolved.site_id, &resolved.id).await?;
				let found = lookup::by_selector("action", &items, action)?;

				lookup::id_of("action", found)?
			},
		};
		let url = self.campaign_actions_url(&resolved.site_id, &resolved.id, Some(&action_id))?;

		self.client.dispatcher().put(url, &patch).await
	}

	async fn list_in_campaign_resolved(
		&self,
		site_id: &str,
		campaign_id: &str,
	) -> Result<Vec<Object>> {
		let url = self.campaign_actions_url(site_id, campaign_id, None)?;
		let merge = MergeFields::new().with("campaignId", campaign_id);

		self.client.dispatcher().get(url, Some(&merge)).await?.into_items()
	}

	fn campaign_actions_url(
		&self,
		site_id: &str,
		campaign_id: &str,
		action_id: Option<&str>,
	) -> Result<Url> {
		let mut segments = vec!["sites", site_id, "sandbox", "campaigns", campaign_id, "actions"];

		if let Some(action_id) = action_id {
			segments.push(action_id);
		}

		self.client.api_url(&segments)
	}
}
