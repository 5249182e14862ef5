//! Redacting wrapper for access and refresh token strings.

// crates.io
use oauth2::http::HeaderValue;
// self
use crate::{_prelude::*, error::ConfigError};

/// Token string kept out of `Debug` output and marked sensitive on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw token value. Do not log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the provider handed back an empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// `Authorization: Bearer <token>` value flagged as sensitive so `http` never prints it.
	pub fn bearer_header(&self) -> Result<HeaderValue> {
		let mut value = HeaderValue::try_from(format!("Bearer {}", self.0))
			.map_err(|err| ConfigError::from(oauth2::http::Error::from(err)))?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret(<{} bytes redacted>)", self.0.len())
	}
}
