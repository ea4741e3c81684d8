//! Name-to-ID resolution helpers over listed API entities.

// self
use crate::{
	_prelude::*,
	dispatch::Object,
	error::{PayloadError, ValidationError},
	resources::Selector,
};

/// Finds the entity whose `id` field equals `id`.
pub fn by_id<'a>(entity: &'static str, items: &'a [Object], id: &str) -> Result<&'a Object> {
	find(entity, items, "id", id)
}

/// Finds the entity whose `name` field equals `name`.
pub fn by_name<'a>(entity: &'static str, items: &'a [Object], name: &str) -> Result<&'a Object> {
	find(entity, items, "name", name)
}

/// Finds the entity matching the selector; IDs match the `id` field, names the `name`
/// field.
pub fn by_selector<'a>(
	entity: &'static str,
	items: &'a [Object],
	selector: &Selector,
) -> Result<&'a Object> {
	match selector {
		Selector::Id(id) => by_id(entity, items, id),
		Selector::Name(name) => by_name(entity, items, name),
	}
}

/// Extracts the `id` string of a listed entity.
pub fn id_of(entity: &'static str, object: &Object) -> Result<String> {
	object
		.get("id")
		.and_then(Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| {
			PayloadError::UnexpectedShape { expected: format!("a string `id` on every {entity}") }
				.into()
		})
}

fn find<'a>(
	entity: &'static str,
	items: &'a [Object],
	field: &str,
	expected: &str,
) -> Result<&'a Object> {
	items
		.iter()
		.find(|item| item.get(field).and_then(Value::as_str) == Some(expected))
		.ok_or_else(|| {
			ValidationError::UnknownEntity { entity, key: expected.to_owned() }.into()
		})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn sites() -> Vec<Object> {
		serde_json::from_str(
			r#"[{"id":"MzIxMzM","name":"www.test.com"},{"id":"MzIxMzI=","name":"m.test.com"}]"#,
		)
		.expect("Site fixture should decode.")
	}

	#[test]
	fn by_name_resolves_listed_entities() {
		let items = sites();
		let site = by_name("site", &items, "m.test.com").expect("Site should resolve by name.");

		assert_eq!(id_of("site", site).expect("Site should carry an ID."), "MzIxMzI=");
	}

	#[test]
	fn by_id_resolves_listed_entities() {
		let items = sites();
		let site = by_id("site", &items, "MzIxMzM").expect("Site should resolve by ID.");

		assert_eq!(site.get("name").and_then(Value::as_str), Some("www.test.com"));
	}

	#[test]
	fn unknown_keys_surface_the_entity_kind() {
		let items = sites();
		let err = by_name("site", &items, "missing.test.com")
			.expect_err("Unknown names should not resolve.");

		assert!(matches!(
			err,
			Error::Validation(ValidationError::UnknownEntity { entity: "site", key }) if key == "missing.test.com"
		));
	}

	#[test]
	fn missing_id_field_is_a_payload_error() {
		let items: Vec<Object> =
			serde_json::from_str(r#"[{"name":"nameless"}]"#).expect("Fixture should decode.");
		let err = id_of("site", &items[0]).expect_err("Missing IDs should be rejected.");

		assert!(matches!(err, Error::Payload(PayloadError::UnexpectedShape { .. })));
	}
}
