//! Immutable client configuration and its validating builder.

// self
use crate::_prelude::*;

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ClientConfigError {
	/// Client identifier is required by every grant.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// Client identifiers cannot contain whitespace.
	#[error("Client identifier contains whitespace.")]
	ClientIdContainsWhitespace,
	/// Redirect URI is required to build authorization URLs and exchange codes.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// Redirect URI must be an absolute HTTP(S) URL.
	#[error("The redirect URI must use HTTP or HTTPS: {url}.")]
	UnsupportedRedirectScheme {
		/// Redirect URI that failed validation.
		url: String,
	},
}

/// Static OAuth client settings handed to a [`Client`](crate::flows::Client) at construction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig", into = "RawClientConfig")]
pub struct ClientConfig {
	client_id: String,
	client_secret: Option<String>,
	redirect_uri: Url,
}
impl ClientConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id)
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Client secret; callers must avoid logging it.
	pub fn client_secret(&self) -> Option<&str> {
		self.client_secret.as_deref()
	}

	/// Default redirect URI registered with the provider.
	pub fn redirect_uri(&self) -> &Url {
		&self.redirect_uri
	}

	fn validate(&self) -> Result<(), ClientConfigError> {
		if self.client_id.is_empty() {
			return Err(ClientConfigError::EmptyClientId);
		}
		if self.client_id.chars().any(char::is_whitespace) {
			return Err(ClientConfigError::ClientIdContainsWhitespace);
		}

		validate_redirect(&self.redirect_uri)
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Client identifier for the configuration being constructed.
	pub client_id: String,
	/// Optional client secret for confidential clients.
	pub client_secret: Option<String>,
	/// Redirect URI (required).
	pub redirect_uri: Option<Url>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: None, redirect_uri: None }
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let redirect_uri = self.redirect_uri.ok_or(ClientConfigError::MissingRedirectUri)?;
		let config =
			ClientConfig { client_id: self.client_id, client_secret: self.client_secret, redirect_uri };

		config.validate()?;

		Ok(config)
	}
}

#[derive(Serialize, Deserialize)]
struct RawClientConfig {
	client_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	client_secret: Option<String>,
	redirect_uri: Url,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ClientConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		let mut builder = ClientConfig::builder(raw.client_id).redirect_uri(raw.redirect_uri);

		if let Some(secret) = raw.client_secret {
			builder = builder.client_secret(secret);
		}

		builder.build()
	}
}
impl From<ClientConfig> for RawClientConfig {
	fn from(config: ClientConfig) -> Self {
		Self {
			client_id: config.client_id,
			client_secret: config.client_secret,
			redirect_uri: config.redirect_uri,
		}
	}
}

fn validate_redirect(url: &Url) -> Result<(), ClientConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ClientConfigError::UnsupportedRedirectScheme { url: url.to_string() }),
	}
}
