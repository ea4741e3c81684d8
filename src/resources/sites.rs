//! Site listing and site-name resolution.

// self
use crate::{_prelude::*, client::Client, dispatch::Object, lookup, resources::Selector};

/// Facade over the `/sites` collection.
#[derive(Clone, Debug)]
pub struct Sites<'a> {
	pub(crate) client: &'a Client,
}
impl Sites<'_> {
	/// Lists every site visible to the authenticated account.
	pub async fn list(&self) -> Result<Vec<Object>> {
		let url = self.client.api_url(&["sites"])?;

		self.client.dispatcher().get(url, None).await?.into_items()
	}

	/// Resolves a site selector to its opaque ID.
	pub async fn resolve_id(&self, site: &Selector) -> Result<String> {
		match site {
			Selector::Id(id) => Ok(id.clone()),
			Selector::Name(name) => {
				let items = self.list().await?;
				let site = lookup::by_name("site", &items, name)?;

				lookup::id_of("site", site)
			},
		}
	}
}
