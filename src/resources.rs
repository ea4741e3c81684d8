//! Per-entity resource facades built on the core dispatcher.
//!
//! Facades translate domain calls into URL templating plus dispatcher calls. Parent
//! entities may be referenced by opaque ID or by human-readable name; IDs take priority
//! and pass through untouched, while names are resolved by listing the parent collection
//! first.

pub mod actions;
pub mod campaigns;
pub mod elements;
pub mod scripts;
pub mod sites;
pub mod variants;

// self
use crate::{_prelude::*, error::ValidationError};

/// Reference to an entity by opaque ID or human-readable name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
	/// Opaque vendor-assigned identifier; used as-is in URLs.
	Id(String),
	/// Display name; resolved to an ID by listing the collection.
	Name(String),
}
impl Selector {
	/// References an entity by its opaque ID.
	pub fn id(id: impl Into<String>) -> Self {
		Self::Id(id.into())
	}

	/// References an entity by its display name.
	pub fn name(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}
}

/// Rejects empty required fields before any network call.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
	if value.is_empty() {
		Err(ValidationError::MissingField { field }.into())
	} else {
		Ok(())
	}
}
