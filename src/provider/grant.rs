//! Grant types the provider can augment token requests for.

/// Token endpoint grant a request is issued for.
///
/// Passed to [`Provider::augment_token_request`](crate::provider::Provider::augment_token_request)
/// so an adapter can add grant-specific form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
	/// `grant_type=authorization_code`.
	AuthorizationCode,
	/// `grant_type=refresh_token`.
	RefreshToken,
}
