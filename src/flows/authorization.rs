// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	flows::Client,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
	provider::Provider,
};

const STATE_LEN: usize = 32;
const DEFAULT_APPROVAL_PROMPT: &str = "auto";

/// Per-call overrides for [`Client::authorization_url`].
///
/// Unset values fall back to the provider's default scopes, a freshly generated `state`,
/// `approval_prompt=auto`, and the configured redirect URI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationOptions {
	/// Scopes to request instead of the provider defaults.
	pub scopes: Option<ScopeSet>,
	/// Caller-chosen `state` value.
	pub state: Option<String>,
	/// `approval_prompt` value (`auto` or `force`).
	pub approval_prompt: Option<String>,
	/// Redirect URI overriding the configured one.
	pub redirect_uri: Option<Url>,
}
impl AuthorizationOptions {
	/// Creates options that keep every default.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests `scopes` instead of the provider defaults.
	pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Uses `state` instead of a generated value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Overrides the `approval_prompt` parameter.
	pub fn with_approval_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.approval_prompt = Some(prompt.into());

		self
	}

	/// Overrides the redirect URI for this request.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}
}

/// Authorization redirect produced by [`Client::authorization_url`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Fully-formed authorize URL that callers should send end-users to.
	pub url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
}
impl AuthorizationRequest {
	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

impl<P, C, M> Client<P, C, M>
where
	P: Provider,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the URL the end-user is redirected to in order to grant access.
	///
	/// The `scope` parameter is always present, joined by the provider's separator, and empty when
	/// no scopes are requested. No HTTP call is made.
	pub fn authorization_url(&self, options: AuthorizationOptions) -> Result<AuthorizationRequest> {
		obs::observe_sync(FlowKind::Authorization, "authorization_url", || {
			self.build_authorization_request(options)
		})
	}

	fn build_authorization_request(
		&self,
		options: AuthorizationOptions,
	) -> Result<AuthorizationRequest> {
		let AuthorizationOptions { scopes, state, approval_prompt, redirect_uri } = options;
		let state = state.filter(|value| !value.is_empty()).unwrap_or_else(random_state);
		let scopes = scopes.unwrap_or_else(|| self.provider.default_scopes());
		let redirect_uri = redirect_uri.unwrap_or_else(|| self.config.redirect_uri().clone());
		let mut params = BTreeMap::new();

		params.insert("client_id".to_owned(), self.config.client_id().to_owned());
		params.insert("redirect_uri".to_owned(), redirect_uri.into());
		params.insert("state".to_owned(), state.clone());
		params.insert("scope".to_owned(), scopes.join(self.provider.scope_separator()));
		params.insert("response_type".to_owned(), "code".to_owned());
		params.insert(
			"approval_prompt".to_owned(),
			approval_prompt.unwrap_or_else(|| DEFAULT_APPROVAL_PROMPT.to_owned()),
		);

		self.provider.augment_authorization_params(&mut params);

		let mut url = self.provider.authorization_base_url()?;

		url.query_pairs_mut().extend_pairs(&params);

		Ok(AuthorizationRequest { url, state })
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
