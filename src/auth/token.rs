//! Immutable access token issued by a grant exchange, plus its builder.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when the access token value is empty.
	#[error("Access token cannot be empty.")]
	EmptyAccessToken,
	/// Issued when `issued_at + expires_in` falls outside the representable date range.
	#[error("Access token expiry is out of range.")]
	ExpiryOutOfRange,
}

/// Access token returned by the token endpoint.
///
/// Every value is fixed at construction; a refresh produces a new token instead of mutating this
/// one. Fields the token endpoint returned beyond the standard ones (`token_type`, Launchpad's
/// `scopes`, ...) stay available through [`values`](Self::values).
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	issued_at: OffsetDateTime,
	expires_at: Option<OffsetDateTime>,
	resource_owner_id: Option<String>,
	values: JsonMap<String, JsonValue>,
}
impl AccessToken {
	/// Returns a builder seeded with the access token value.
	pub fn builder(access_token: impl Into<String>) -> AccessTokenBuilder {
		AccessTokenBuilder::new().access_token(access_token)
	}

	/// Access token secret; callers must avoid logging it.
	pub fn token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Refresh token secret, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Instant the token response was received.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Expiry instant derived from `expires_in`, when the provider sent one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Identifier of the resource owner, for providers that put it in the token response.
	pub fn resource_owner_id(&self) -> Option<&str> {
		self.resource_owner_id.as_deref()
	}

	/// Additional response fields not modeled above.
	pub fn values(&self) -> &JsonMap<String, JsonValue> {
		&self.values
	}

	/// Returns `true` if the token has expired at the provided instant.
	///
	/// Tokens without an expiry never expire.
	pub fn has_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn has_expired(&self) -> bool {
		self.has_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.field("resource_owner_id", &self.resource_owner_id)
			.field("values", &self.values)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug, Default)]
pub struct AccessTokenBuilder {
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
	resource_owner_id: Option<String>,
	values: JsonMap<String, JsonValue>,
}
impl AccessTokenBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Records the resource owner identifier.
	pub fn resource_owner_id(mut self, id: impl Into<String>) -> Self {
		self.resource_owner_id = Some(id.into());

		self
	}

	/// Replaces the additional response values.
	pub fn values(mut self, values: JsonMap<String, JsonValue>) -> Self {
		self.values = values;

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let access_token = self.access_token.ok_or(AccessTokenBuilderError::MissingAccessToken)?;

		if access_token.is_empty() {
			return Err(AccessTokenBuilderError::EmptyAccessToken);
		}

		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => Some(instant),
			(None, Some(delta)) => Some(
				issued_at.checked_add(delta).ok_or(AccessTokenBuilderError::ExpiryOutOfRange)?,
			),
			(None, None) => None,
		};

		Ok(AccessToken {
			access_token,
			refresh_token: self.refresh_token,
			issued_at,
			expires_at,
			resource_owner_id: self.resource_owner_id,
			values: self.values,
		})
	}
}
