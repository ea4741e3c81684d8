//! Element variant listing, creation, and updates.

// self
use crate::{
	_prelude::*,
	client::Client,
	dispatch::Object,
	lookup,
	resources::{self, Selector},
};

/// Payload for creating an element variant.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
	/// Variant name; required and non-empty.
	pub name: String,
	/// Variant markup served to visitors.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// Marks the variant as the element default.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_default: Option<bool>,
	/// Marks the variant as the control.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_control: Option<bool>,
	/// Traffic weight assigned to the variant.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub weight: Option<u32>,
}
impl VariantDraft {
	/// Creates a draft with the required name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), content: None, is_default: None, is_control: None, weight: None }
	}

	/// Sets the variant markup.
	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = Some(content.into());

		self
	}

	/// Marks the variant as the element default.
	pub fn with_is_default(mut self, is_default: bool) -> Self {
		self.is_default = Some(is_default);

		self
	}

	/// Marks the variant as the control.
	pub fn with_is_control(mut self, is_control: bool) -> Self {
		self.is_control = Some(is_control);

		self
	}

	/// Sets the traffic weight.
	pub fn with_weight(mut self, weight: u32) -> Self {
		self.weight = Some(weight);

		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		resources::require("name", &self.name)
	}
}

/// Partial update for an existing variant; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPatch {
	/// Replacement name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement markup.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// Replacement default flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_default: Option<bool>,
	/// Replacement control flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_control: Option<bool>,
	/// Replacement traffic weight.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub weight: Option<u32>,
}

/// Facade over `.../elements/{element}/variants`.
#[derive(Clone, Debug)]
pub struct Variants<'a> {
	pub(crate) client: &'a Client,
}
impl Variants<'_> {
	/// Lists the element's variants.
	pub async fn list(
		&self,
		site: &Selector,
		campaign: &Selector,
		element: &Selector,
	) -> Result<Vec<Object>> {
		let resolved = self.client.elements().resolve(site, campaign, element).await?;
		let url = self.variants_url(&resolved.site_id, &resolved.campaign_id, &resolved.id, None)?;

		self.client.dispatcher().get(url, None).await?.into_items()
	}

	/// Creates a variant for the element.
	pub async fn create(
		&self,
		site: &Selector,
		campaign: &Selector,
		element: &Selector,
		draft: VariantDraft,
	) -> Result<Object> {
		draft.validate()?;

		let resolved = self.client.elements().resolve(site, campaign, element).await?;
		let url = self.variants_url(&resolved.site_id, &resolved.campaign_id, &resolved.id, None)?;

		self.client.dispatcher().post(url, &draft).await
	}

	/// Updates a variant referenced by ID or name.
	pub async fn update(
		&self,
		site: &Selector,
		campaign: &Selector,
		element: &Selector,
		variant: &Selector,
		patch: VariantPatch,
	) -> Result<Object> {
		let resolved = self.client.elements().resolve(site, campaign, element).await?;
		let variant_id = match variant {
			Selector::Id(id) => id.clone(),
			Selector::Name(_) => {
				let url = self.variants_url(
					&resolved.site_id,
					&resolved.campaign_id,
					&resolved.id,
					None,
				)?;
				let items = self.client.dispatcher().get(url, None).await?.into_items()?;
				let found = lookup::by_selector("variant", &items, variant)?;

				lookup::id_of("variant", found)?
			},
		};
		let url = self.variants_url(
			&resolved.site_id,
			&resolved.campaign_id,
			&resolved.id,
			Some(&variant_id),
		)?;

		self.client.dispatcher().put(url, &patch).await
	}

	fn variants_url(
		&self,
		site_id: &str,
		campaign_id: &str,
		element_id: &str,
		variant_id: Option<&str>,
	) -> Result<Url> {
		let mut segments = vec![
			"sites",
			site_id,
			"sandbox",
			"campaigns",
			campaign_id,
			"elements",
			element_id,
			"variants",
		];

		if let Some(variant_id) = variant_id {
			segments.push(variant_id);
		}

		self.client.api_url(&segments)
	}
}
