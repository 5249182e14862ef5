//! Client-level error types shared across flows, providers, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider answered with a recognized error payload.
	#[error(transparent)]
	IdentityProvider(#[from] IdentityProviderError),

	/// Provider responded with a body that could not be parsed.
	#[error("Provider returned a malformed response body.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Provider answered in a way the grant machinery does not understand (empty error body,
	/// unexpected content type).
	#[error("Provider returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Description of the mismatch.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Authorization redirect carried a different `state` than the one issued.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Error payload reported by the identity provider.
///
/// Raised whenever a token or resource-owner response carries a recognized `error` field, either
/// as a plain string or as an object with a `message` member.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Identity provider returned an error: {message}.")]
pub struct IdentityProviderError {
	/// Message extracted from the `error` field.
	pub message: String,
	/// Provider-supplied `error_description`, if any.
	pub description: Option<String>,
	/// HTTP status code of the failing response, when known.
	pub status: Option<u16>,
	/// Raw response body for diagnostics.
	pub body: String,
}
impl IdentityProviderError {
	/// Creates an error from the extracted message and the response context.
	pub fn new(message: impl Into<String>, status: Option<u16>, body: impl Into<String>) -> Self {
		Self { message: message.into(), description: None, status, body: body.into() }
	}

	/// Attaches the provider's `error_description`.
	pub fn with_description(mut self, description: Option<String>) -> Self {
		self.description = description;

		self
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider endpoint URL cannot be derived or parsed.
	#[error("Provider endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Client configuration builder validation failed.
	#[error("Client configuration is invalid.")]
	InvalidConfig(#[from] crate::config::ClientConfigError),
	/// Access token builder validation failed.
	#[error("Unable to build access token.")]
	TokenBuild(#[from] crate::auth::AccessTokenBuilderError),
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
		/// HTTP status code, when the transport saw one.
		status: Option<u16>,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src), status: None }
	}

	/// Records the HTTP status observed before the failure.
	pub fn with_status(self, status: Option<u16>) -> Self {
		match self {
			Self::Network { source, .. } => Self::Network { source, status },
			Self::Other { message, .. } => Self::Other { message, status },
			other => other,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		let status = e.status().map(|code| code.as_u16());

		Self::network(e).with_status(status)
	}
}
