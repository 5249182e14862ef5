//! 37signals Launchpad adapter.
//!
//! Launchpad is the identity service behind Basecamp, HEY, and the other 37signals products.
//! It deviates from plain OAuth 2.0 in a few places this adapter absorbs:
//!
//! - every authorization and token request carries a `type` parameter (`web_server` for the
//!   authorization step and code exchange, `refresh` for refreshes);
//! - client credentials travel as form fields rather than HTTP Basic;
//! - the profile endpoint (`/authorization.json`) returns the user under `identity` next to the
//!   list of accounts the token grants access to.

mod user;

pub use user::*;

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::ConfigError,
	provider::{ClientAuthMethod, ErrorBody, GrantType, Provider},
};

/// Public Launchpad origin.
pub const LAUNCHPAD_BASE_URL: &str = "https://launchpad.37signals.com/";

const AUTHORIZATION_PATH: &str = "authorization/new";
const TOKEN_PATH: &str = "authorization/token";
const RESOURCE_OWNER_PATH: &str = "authorization.json";

/// Provider adapter for 37signals Launchpad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thirtysevensignals {
	base_url: String,
}
impl Thirtysevensignals {
	/// Creates an adapter targeting the public Launchpad service.
	pub fn new() -> Self {
		Self { base_url: LAUNCHPAD_BASE_URL.into() }
	}

	/// Creates an adapter whose endpoints resolve against `base_url` instead of the public
	/// service (staging hosts, local mocks).
	///
	/// The base must be able to carry a path; a missing trailing slash is added so endpoint paths
	/// nest under any path prefix.
	pub fn with_base_url(mut base_url: Url) -> Result<Self> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidEndpoint {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			}
			.into());
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		Ok(Self { base_url: base_url.into() })
	}

	/// Base URL endpoint paths are joined onto.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		Url::parse(&self.base_url)
			.and_then(|base| base.join(path))
			.map_err(|source| ConfigError::InvalidEndpoint { source }.into())
	}
}
impl Default for Thirtysevensignals {
	fn default() -> Self {
		Self::new()
	}
}
impl Provider for Thirtysevensignals {
	type ResourceOwner = ThirtysevensignalsUser;

	fn name(&self) -> &'static str {
		"thirtysevensignals"
	}

	fn authorization_base_url(&self) -> Result<Url> {
		self.endpoint(AUTHORIZATION_PATH)
	}

	fn token_base_url(&self) -> Result<Url> {
		self.endpoint(TOKEN_PATH)
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> Result<Url> {
		self.endpoint(RESOURCE_OWNER_PATH)
	}

	fn augment_authorization_params(&self, params: &mut BTreeMap<String, String>) {
		params.insert("type".into(), "web_server".into());
	}

	fn augment_token_request(&self, grant: GrantType, form: &mut BTreeMap<String, String>) {
		let kind = match grant {
			GrantType::AuthorizationCode => "web_server",
			GrantType::RefreshToken => "refresh",
		};

		form.insert("type".into(), kind.into());
	}

	fn client_auth_method(&self) -> ClientAuthMethod {
		ClientAuthMethod::ClientSecretPost
	}

	// Only the body shape decides; a status code alone never turns a response into an error.
	fn check_response(&self, status: u16, body: &JsonValue, raw: &str) -> Result<()> {
		match ErrorBody::decode(body).into_error(Some(status), raw) {
			Some(err) => Err(err.into()),
			None => Ok(()),
		}
	}

	fn parse_resource_owner(
		&self,
		body: JsonValue,
		_token: &AccessToken,
	) -> Result<Self::ResourceOwner> {
		ThirtysevensignalsUser::from_value(body)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn token() -> AccessToken {
		AccessToken::builder("mock_access_token").build().expect("Token fixture should build.")
	}

	#[test]
	fn endpoints_resolve_against_launchpad() {
		let provider = Thirtysevensignals::new();

		assert_eq!(
			provider.authorization_base_url().expect("Authorization URL should resolve.").as_str(),
			"https://launchpad.37signals.com/authorization/new"
		);
		assert_eq!(
			provider.token_base_url().expect("Token URL should resolve.").as_str(),
			"https://launchpad.37signals.com/authorization/token"
		);
		assert_eq!(
			provider
				.resource_owner_details_url(&token())
				.expect("Resource owner URL should resolve.")
				.as_str(),
			"https://launchpad.37signals.com/authorization.json"
		);
	}

	#[test]
	fn custom_base_keeps_path_prefix() {
		let base = Url::parse("http://127.0.0.1:8080/launchpad?x=1")
			.expect("Custom base fixture should parse.");
		let provider =
			Thirtysevensignals::with_base_url(base).expect("Custom base should be accepted.");

		assert_eq!(provider.base_url(), "http://127.0.0.1:8080/launchpad/");
		assert_eq!(
			provider.token_base_url().expect("Token URL should resolve.").path(),
			"/launchpad/authorization/token"
		);
	}

	#[test]
	fn cannot_be_a_base_urls_are_rejected() {
		let base = Url::parse("mailto:ops@example.com").expect("Mailto fixture should parse.");

		assert!(matches!(
			Thirtysevensignals::with_base_url(base),
			Err(Error::Config(ConfigError::InvalidEndpoint { .. }))
		));
	}

	#[test]
	fn defaults_match_launchpad_conventions() {
		let provider = Thirtysevensignals::default();

		assert!(provider.default_scopes().is_empty());
		assert_eq!(provider.scope_separator(), ",");
		assert_eq!(provider.client_auth_method(), ClientAuthMethod::ClientSecretPost);
		assert_eq!(provider.access_token_resource_owner_id(), None);
	}

	#[test]
	fn request_params_carry_launchpad_type() {
		let provider = Thirtysevensignals::new();
		let mut params = BTreeMap::new();

		provider.augment_authorization_params(&mut params);

		assert_eq!(params.get("type").map(String::as_str), Some("web_server"));

		let mut form = BTreeMap::new();

		provider.augment_token_request(GrantType::RefreshToken, &mut form);

		assert_eq!(form.get("type").map(String::as_str), Some("refresh"));

		provider.augment_token_request(GrantType::AuthorizationCode, &mut form);

		assert_eq!(form.get("type").map(String::as_str), Some("web_server"));
	}

	#[test]
	fn check_response_ignores_status_without_error_shape() {
		let provider = Thirtysevensignals::new();
		let payloads = [
			json!({ "error": "mock_error", "error_description": "mock_error_description" }),
			json!({ "error": { "message": "mock_error" }, "error_description": "mock_error_description" }),
			json!({ "foo": "bar" }),
		];
		let failures = payloads
			.iter()
			.filter(|body| provider.check_response(500, body, &body.to_string()).is_err())
			.count();

		assert_eq!(failures, 2);
	}

	#[test]
	fn check_response_carries_context() {
		let provider = Thirtysevensignals::new();
		let body = json!({ "error": { "message": "mock_error" } });
		let raw = body.to_string();
		let err = provider
			.check_response(401, &body, &raw)
			.expect_err("Nested error payload should fail.");

		match err {
			Error::IdentityProvider(inner) => {
				assert_eq!(inner.message, "mock_error");
				assert_eq!(inner.status, Some(401));
				assert_eq!(inner.body, raw);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
