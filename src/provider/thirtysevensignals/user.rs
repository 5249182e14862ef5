// crates.io
use serde::{Deserializer, de::Error as DeError};
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, provider::ResourceOwner};

/// Launchpad user profile parsed from `/authorization.json`.
///
/// Typed accessors cover the `identity` object, the granted accounts, and the token expiry; the
/// complete payload stays available through [`to_value`](ResourceOwner::to_value).
#[derive(Clone, Debug, PartialEq)]
pub struct ThirtysevensignalsUser {
	identity: Option<Identity>,
	accounts: Vec<Account>,
	expires_at: Option<OffsetDateTime>,
	raw: JsonValue,
}
impl ThirtysevensignalsUser {
	/// Parses a profile response.
	///
	/// A payload without `identity` yields a user whose identity accessors return `None`; a field
	/// of the wrong type, or a document that is not a JSON object, fails with
	/// [`Error::ResponseParse`].
	pub fn from_value(raw: JsonValue) -> Result<Self> {
		let body: AuthorizationBody =
			serde_path_to_error::deserialize::<_, JsonMap<String, JsonValue>>(&raw)
				.and_then(|_| serde_path_to_error::deserialize(&raw))
				.map_err(|source| Error::ResponseParse { source, status: None })?;

		Ok(Self { identity: body.identity, accounts: body.accounts, expires_at: body.expires_at, raw })
	}

	/// Numeric Launchpad identity id.
	pub fn id(&self) -> Option<u64> {
		self.identity.as_ref().map(|identity| identity.id)
	}

	/// Email address on the identity.
	pub fn email(&self) -> Option<&str> {
		self.identity.as_ref()?.email_address.as_deref()
	}

	/// Given name.
	pub fn first_name(&self) -> Option<&str> {
		self.identity.as_ref()?.first_name.as_deref()
	}

	/// Family name.
	pub fn last_name(&self) -> Option<&str> {
		self.identity.as_ref()?.last_name.as_deref()
	}

	/// Full name, `"first last"`.
	pub fn name(&self) -> Option<String> {
		match (self.first_name(), self.last_name()) {
			(Some(first), Some(last)) => Some(format!("{first} {last}")),
			(Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
			(None, None) => None,
		}
	}

	/// Accounts the token grants access to.
	pub fn accounts(&self) -> &[Account] {
		&self.accounts
	}

	/// Accounts for a single product (`bc3`, `hey`, ...).
	pub fn accounts_for<'a>(&'a self, product: &'a str) -> impl Iterator<Item = &'a Account> {
		self.accounts.iter().filter(move |account| account.product == product)
	}

	/// Expiry of the access token used to fetch this profile.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Consumes the user and returns the raw payload.
	pub fn into_value(self) -> JsonValue {
		self.raw
	}
}
impl ResourceOwner for ThirtysevensignalsUser {
	fn resource_owner_id(&self) -> Option<String> {
		self.id().map(|id| id.to_string())
	}

	fn to_value(&self) -> &JsonValue {
		&self.raw
	}
}

/// Account entry listed in a Launchpad profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	/// Account id, used in product API URLs.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Product code (`bc3` for Basecamp, ...).
	pub product: String,
	/// API base URL for the account.
	pub href: String,
	/// Web URL for the account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app_href: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct Identity {
	id: u64,
	#[serde(default)]
	email_address: Option<String>,
	#[serde(default)]
	first_name: Option<String>,
	#[serde(default)]
	last_name: Option<String>,
}

#[derive(Deserialize)]
struct AuthorizationBody {
	#[serde(default)]
	identity: Option<Identity>,
	#[serde(default)]
	accounts: Vec<Account>,
	#[serde(default, deserialize_with = "deserialize_rfc3339")]
	expires_at: Option<OffsetDateTime>,
}

fn deserialize_rfc3339<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	<Option<String>>::deserialize(deserializer)?
		.map(|value| OffsetDateTime::parse(&value, &Rfc3339).map_err(DeError::custom))
		.transpose()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	fn profile() -> JsonValue {
		json!({
			"expires_at": "2016-09-01T04:33:30.000Z",
			"identity": {
				"id": 1234,
				"email_address": "jason@example.com",
				"first_name": "Jason",
				"last_name": "Fried"
			},
			"accounts": [
				{
					"id": 1234,
					"name": "Base Camp Test",
					"product": "bc3",
					"href": "https://3.basecampapi.com/1234",
					"app_href": "https://3.basecamp.com/1234"
				},
				{
					"id": 99,
					"name": "Mail",
					"product": "hey",
					"href": "https://app.hey.com/99"
				}
			]
		})
	}

	#[test]
	fn parses_identity_and_accounts() {
		let user = ThirtysevensignalsUser::from_value(profile()).expect("Profile should parse.");

		assert_eq!(user.id(), Some(1234));
		assert_eq!(user.resource_owner_id().as_deref(), Some("1234"));
		assert_eq!(user.email(), Some("jason@example.com"));
		assert_eq!(user.name().as_deref(), Some("Jason Fried"));
		assert_eq!(user.accounts().len(), 2);
		assert_eq!(user.accounts_for("bc3").map(|account| account.id).collect::<Vec<_>>(), vec![1234_u64]);
		assert_eq!(user.expires_at(), Some(macros::datetime!(2016-09-01 04:33:30 UTC)));
	}

	#[test]
	fn raw_payload_is_preserved() {
		let user = ThirtysevensignalsUser::from_value(profile()).expect("Profile should parse.");
		let raw = user.to_value();

		assert_eq!(raw["identity"]["id"], 1234);
		assert_eq!(raw["identity"]["email_address"], "jason@example.com");
		assert_eq!(raw["accounts"][0]["name"], "Base Camp Test");
		assert_eq!(user.into_value(), profile());
	}

	#[test]
	fn non_object_documents_are_rejected() {
		for body in [json!([]), json!(["mock_error"]), json!("profile"), JsonValue::Null] {
			assert!(
				matches!(
					ThirtysevensignalsUser::from_value(body.clone()),
					Err(Error::ResponseParse { status: None, .. })
				),
				"{body} must not parse as a profile."
			);
		}
	}

	#[test]
	fn missing_identity_yields_empty_accessors() {
		let user = ThirtysevensignalsUser::from_value(json!({ "foo": "bar" }))
			.expect("Payload without identity should still parse.");

		assert_eq!(user.id(), None);
		assert_eq!(user.email(), None);
		assert_eq!(user.name(), None);
		assert!(user.accounts().is_empty());
		assert_eq!(user.to_value()["foo"], "bar");
	}

	#[test]
	fn partial_names_join_what_is_present() {
		let user = ThirtysevensignalsUser::from_value(json!({
			"identity": { "id": 7, "first_name": "Jason" }
		}))
		.expect("Partial identity should parse.");

		assert_eq!(user.name().as_deref(), Some("Jason"));
	}

	#[test]
	fn mistyped_fields_fail_with_path() {
		let err = ThirtysevensignalsUser::from_value(json!({ "identity": { "id": "not-a-number" } }))
			.expect_err("String identifiers must be rejected.");

		match err {
			Error::ResponseParse { source, .. } => assert_eq!(source.path().to_string(), "identity.id"),
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert!(
			ThirtysevensignalsUser::from_value(json!({ "expires_at": "yesterday" })).is_err(),
			"Invalid timestamps must be rejected."
		);
	}
}
