// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::Client,
	http::ProviderHttpClient,
	oauth::{TokenFacade, TransportErrorMapper},
	obs::{self, FlowKind},
	provider::Provider,
};

impl<P, C, M> Client<P, C, M>
where
	P: Provider,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the authorization `code` from the redirect for an [`AccessToken`].
	///
	/// Sends `grant_type=authorization_code` with the configured redirect URI, the client
	/// credentials, and the provider's extra fields in a single POST.
	pub async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		obs::observe(FlowKind::AuthorizationCode, "exchange_code", async {
			self.token_facade()?.exchange_code(&self.provider, code).await
		})
		.await
	}

	/// Trades a refresh token for a new [`AccessToken`] (`grant_type=refresh_token`).
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken> {
		obs::observe(FlowKind::Refresh, "refresh_access_token", async {
			self.token_facade()?.refresh_token(&self.provider, refresh_token).await
		})
		.await
	}

	fn token_facade(&self) -> Result<TokenFacade<C, M>> {
		TokenFacade::from_provider(
			&self.provider,
			&self.config,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)
	}
}
