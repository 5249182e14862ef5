// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::ConfigError,
	flows::Client,
	http::{ProviderHttpClient, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind},
	provider::Provider,
};

impl<P, C, M> Client<P, C, M>
where
	P: Provider,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the profile of the user who granted `token`.
	///
	/// Issues one bearer-authenticated GET, lets the provider reject error payloads, then parses
	/// the body into the provider's resource-owner type.
	pub async fn resource_owner(&self, token: &AccessToken) -> Result<P::ResourceOwner> {
		obs::observe(FlowKind::ResourceOwner, "resource_owner", self.fetch_resource_owner(token))
			.await
	}

	async fn fetch_resource_owner(&self, token: &AccessToken) -> Result<P::ResourceOwner> {
		let url = self.provider.resource_owner_details_url(token)?;
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, token.token().bearer_header()?)
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = instrumented.call(request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(
				FlowKind::ResourceOwner,
				meta.take().as_ref(),
				err,
			)
		})?;
		let status = response.status().as_u16();

		#[cfg(feature = "tracing")]
		tracing::debug!(provider = self.provider.name(), status, "Resource owner response received.");

		let body = response.body();
		let value =
			parse_json(body).map_err(|source| Error::ResponseParse { source, status: Some(status) })?;

		self.provider.check_response(status, &value, &String::from_utf8_lossy(body))?;
		self.provider.parse_resource_owner(value, token).map_err(|err| match err {
			Error::ResponseParse { source, status: None } =>
				Error::ResponseParse { source, status: Some(status) },
			other => other,
		})
	}
}

fn parse_json(body: &[u8]) -> Result<JsonValue, serde_path_to_error::Error<serde_json::Error>> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let value = serde_path_to_error::deserialize(&mut deserializer)?;

	deserializer.end().map_err(|err| {
		serde_path_to_error::Error::new(serde_path_to_error::Track::new().path(), err)
	})?;

	Ok(value)
}
