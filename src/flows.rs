//! Client flows driving a [`Provider`] through the authorization code grant.

mod authorization;
mod resource_owner;
mod token;

pub use authorization::*;

// self
use crate::{
	_prelude::*, config::ClientConfig, http::ProviderHttpClient, oauth::TransportErrorMapper,
	provider::Provider,
};
#[cfg(feature = "reqwest")]
use crate::{
	http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper, provider::Thirtysevensignals,
};

#[cfg(feature = "reqwest")]
/// Launchpad client on the crate's default reqwest transport stack.
pub type ThirtysevensignalsClient =
	Client<Thirtysevensignals, ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Runs OAuth 2.0 flows against a single provider.
///
/// The client owns the immutable configuration, the provider adapter, and the HTTP transport so
/// each flow only has to describe its own request. Every operation issues at most one HTTP call
/// and keeps no state between calls; share the client freely across tasks.
pub struct Client<P, C, M>
where
	P: Provider,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Client credentials and redirect URI.
	pub config: ClientConfig,
	/// Provider adapter that defines endpoints and quirks.
	pub provider: P,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
}
impl<P, C, M> Client<P, C, M>
where
	P: Provider,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		provider: P,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			provider,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl<P> Client<P, ReqwestHttpClient, ReqwestTransportErrorMapper>
where
	P: Provider,
{
	/// Creates a client backed by a default reqwest transport.
	///
	/// The transport does not follow redirects; token and profile endpoints answer directly.
	pub fn new(config: ClientConfig, provider: P) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self::with_http_client(
			config,
			provider,
			ReqwestHttpClient::with_client(client),
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<P, C, M> Clone for Client<P, C, M>
where
	P: Provider + Clone,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			provider: self.provider.clone(),
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
		}
	}
}
impl<P, C, M> Debug for Client<P, C, M>
where
	P: Provider + Debug,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("provider", &self.provider)
			.finish()
	}
}
