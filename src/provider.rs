//! Provider capabilities consumed by the generic [`Client`](crate::flows::Client).
//!
//! [`Provider`] is the seam between the grant flows and a concrete identity service: it names
//! the endpoints, scope conventions, and extra request parameters, and it owns the parsing of
//! error and resource-owner payloads. Implementations only see crate-owned data (URLs, JSON
//! values, status codes), so they stay independent of any HTTP client.

pub mod error_body;
pub mod grant;
pub mod thirtysevensignals;

pub use error_body::*;
pub use grant::*;
pub use thirtysevensignals::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet},
};

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Profile of an authenticated end-user as returned by a provider.
pub trait ResourceOwner: Debug + Send + Sync {
	/// Provider-assigned identifier rendered as a string, when present.
	fn resource_owner_id(&self) -> Option<String>;

	/// Full response payload the profile was parsed from.
	fn to_value(&self) -> &JsonValue;
}

/// Provider-specific behavior plugged into the generic client.
///
/// Override only what you need: the parameter hooks default to no-ops, scopes default to an
/// empty set joined by `,`, and clients authenticate with HTTP Basic unless told otherwise.
pub trait Provider: 'static + Send + Sync {
	/// Typed profile produced by [`parse_resource_owner`](Self::parse_resource_owner).
	type ResourceOwner: ResourceOwner;

	/// Human-readable provider name used in logs.
	fn name(&self) -> &'static str;

	/// Authorization endpoint the end-user is redirected to.
	fn authorization_base_url(&self) -> Result<Url>;

	/// Token endpoint used for code exchanges and refreshes.
	fn token_base_url(&self) -> Result<Url>;

	/// Endpoint serving the resource-owner profile for `token`.
	fn resource_owner_details_url(&self, token: &AccessToken) -> Result<Url>;

	/// Scopes requested when the caller does not supply any.
	fn default_scopes(&self) -> ScopeSet {
		ScopeSet::default()
	}

	/// Separator used to join scopes into the `scope` parameter.
	fn scope_separator(&self) -> &'static str {
		","
	}

	/// Adds provider-specific query parameters to the authorization URL.
	fn augment_authorization_params(&self, _params: &mut BTreeMap<String, String>) {}

	/// Adds provider-specific form parameters to token requests.
	fn augment_token_request(&self, _grant: GrantType, _form: &mut BTreeMap<String, String>) {}

	/// How the client proves its identity to the token endpoint.
	fn client_auth_method(&self) -> ClientAuthMethod {
		ClientAuthMethod::default()
	}

	/// Token response field carrying the resource-owner id, if the provider sends one.
	fn access_token_resource_owner_id(&self) -> Option<&'static str> {
		None
	}

	/// Inspects a parsed response and fails when it carries a provider error.
	///
	/// `raw` is the undecoded body, kept for the error context.
	fn check_response(&self, status: u16, body: &JsonValue, raw: &str) -> Result<()>;

	/// Builds the typed resource owner from a checked profile response.
	fn parse_resource_owner(
		&self,
		body: JsonValue,
		token: &AccessToken,
	) -> Result<Self::ResourceOwner>;
}
