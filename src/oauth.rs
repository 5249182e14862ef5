//! Internal OAuth client facade abstractions.
//!
//! Token grants run through [`oauth2::Client`]; this module configures it from a [`Provider`],
//! adds the provider's extra form fields, and folds `oauth2` failures into the crate's [`Error`].

// crates.io
use oauth2::{
	AuthType, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	ExtraTokenFields, HttpClientError, RedirectUrl, RefreshToken, RequestTokenError,
	StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenBuilderError},
	config::ClientConfig,
	error::{ConfigError, IdentityProviderError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::FlowKind,
	provider::{ClientAuthMethod, ErrorBody, GrantType, Provider},
};

type ConfiguredClient = oauth2::Client<
	BasicErrorResponse,
	ProviderTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Token endpoint response with every non-standard field kept in [`ProviderTokenFields`].
pub type ProviderTokenResponse = StandardTokenResponse<ProviderTokenFields, BasicTokenType>;

/// Fields a token response carries beyond the RFC 6749 set (Launchpad's `scopes`, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderTokenFields(pub JsonMap<String, JsonValue>);
impl ExtraTokenFields for ProviderTokenFields {}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(
		&self,
		flow: FlowKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		flow: FlowKind,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Other { message, status: meta_status(meta) }.into(),
			_ => TransportError::Other {
				message: format!("{flow} request failed without a structured error"),
				status: meta_status(meta),
			}
			.into(),
		}
	}
}

pub(crate) struct TokenFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredClient,
	redirect_uri: Url,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> TokenFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_provider<P>(
		provider: &P,
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self>
	where
		P: Provider,
	{
		let token_url = TokenUrl::new(provider.token_base_url()?.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let redirect_url = RedirectUrl::new(config.redirect_uri().to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut oauth_client: ConfiguredClient =
			oauth2::Client::new(ClientId::new(config.client_id().to_owned()))
				.set_token_uri(token_url)
				.set_redirect_uri(redirect_url);

		if let Some(secret) = config.client_secret() {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
		}
		if matches!(provider.client_auth_method(), ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			redirect_uri: config.redirect_uri().clone(),
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	pub(crate) async fn exchange_code<P>(&self, provider: &P, code: &str) -> Result<AccessToken>
	where
		P: Provider,
	{
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let mut params = BTreeMap::new();

		provider.augment_token_request(GrantType::AuthorizationCode, &mut params);

		let mut request = self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

		for (key, value) in params {
			request = request.add_extra_param(key, value);
		}

		let response = request.request_async(&instrumented).await.map_err(|err| {
			map_request_error(
				FlowKind::AuthorizationCode,
				meta.take(),
				err,
				self.error_mapper.as_ref(),
			)
		})?;

		map_token_response(provider, response)
	}

	pub(crate) async fn refresh_token<P>(
		&self,
		provider: &P,
		refresh_token: &str,
	) -> Result<AccessToken>
	where
		P: Provider,
	{
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let mut params = BTreeMap::new();

		params.insert("redirect_uri".to_owned(), self.redirect_uri.to_string());
		provider.augment_token_request(GrantType::RefreshToken, &mut params);

		let mut request = self.oauth_client.exchange_refresh_token(&refresh_secret);

		for (key, value) in params {
			request = request.add_extra_param(key, value);
		}

		let response = request.request_async(&instrumented).await.map_err(|err| {
			map_request_error(FlowKind::Refresh, meta.take(), err, self.error_mapper.as_ref())
		})?;

		map_token_response(provider, response)
	}
}

fn map_token_response<P>(provider: &P, response: ProviderTokenResponse) -> Result<AccessToken>
where
	P: Provider,
{
	let token_type: &str = response.token_type().as_ref();
	let mut values = response.extra_fields().0.clone();

	values.insert("token_type".into(), JsonValue::String(token_type.to_owned()));

	let mut builder = AccessToken::builder(response.access_token().secret().to_owned())
		.issued_at(OffsetDateTime::now_utc());

	if let Some(expires_in) = response.expires_in() {
		let expires_in =
			i64::try_from(expires_in.as_secs()).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		builder = builder.expires_in(Duration::seconds(expires_in));
	}
	if let Some(refresh) = response.refresh_token() {
		builder = builder.refresh_token(refresh.secret().to_owned());
	}
	if let Some(id) =
		provider.access_token_resource_owner_id().and_then(|key| values.get(key)).and_then(owner_id)
	{
		builder = builder.resource_owner_id(id);
	}

	builder.values(values).build().map_err(|err| match err {
		AccessTokenBuilderError::ExpiryOutOfRange => ConfigError::ExpiresInOutOfRange.into(),
		other => ConfigError::from(other).into(),
	})
}

fn owner_id(value: &JsonValue) -> Option<String> {
	match value {
		JsonValue::String(id) => Some(id.clone()),
		JsonValue::Number(id) => Some(id.to_string()),
		_ => None,
	}
}

fn map_request_error<E, M>(
	flow: FlowKind,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();
	let status = meta_status(meta_ref);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => mapper.map_transport_error(flow, meta_ref, error),
		// `oauth2` only understands string `error` fields; nested messages land here.
		RequestTokenError::Parse(source, body) => match ErrorBody::decode_slice(&body)
			.into_error(status, &String::from_utf8_lossy(&body))
		{
			Some(err) => err.into(),
			None => Error::ResponseParse { source, status },
		},
		RequestTokenError::Other(message) => Error::UnexpectedResponse { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let body = serde_json::to_string(&response).unwrap_or_default();
	let code: &str = response.error().as_ref();

	IdentityProviderError::new(code, status, body)
		.with_description(response.error_description().cloned())
		.into()
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	let status = meta_status(meta).or_else(|| err.status().map(|code| code.as_u16()));

	TransportError::from(err).with_status(status).into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{_preludet::test_config, http::ReqwestHttpClient, provider::Thirtysevensignals};

	type TestError = BasicRequestTokenError<HttpClientError<ReqwestError>>;

	fn map(err: TestError, status: Option<u16>) -> Error {
		let meta = ResponseMetadata { status };

		map_request_error(FlowKind::AuthorizationCode, Some(meta), err, &ReqwestTransportErrorMapper)
	}

	fn parse_failure(body: &[u8]) -> TestError {
		let source = serde_path_to_error::deserialize::<_, ProviderTokenResponse>(
			&mut serde_json::Deserializer::from_slice(body),
		)
		.expect_err("Fixture body must not parse as a token response.");

		RequestTokenError::Parse(source, body.to_vec())
	}

	fn token_response(body: JsonValue) -> ProviderTokenResponse {
		serde_json::from_value(body).expect("Token response fixture should deserialize.")
	}

	#[test]
	fn builds_facade_for_launchpad() {
		let facade = <TokenFacade<ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_provider(
			&Thirtysevensignals::new(),
			&test_config(),
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		);

		assert!(facade.is_ok());
	}

	#[test]
	fn server_response_maps_to_identity_provider_error() {
		let response: BasicErrorResponse = serde_json::from_value(
			json!({ "error": "invalid_grant", "error_description": "Code expired." }),
		)
		.expect("Error response fixture should deserialize.");

		match map(RequestTokenError::ServerResponse(response), Some(400)) {
			Error::IdentityProvider(err) => {
				assert_eq!(err.message, "invalid_grant");
				assert_eq!(err.description.as_deref(), Some("Code expired."));
				assert_eq!(err.status, Some(400));
				assert!(err.body.contains("invalid_grant"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn nested_error_message_is_recognized_after_parse_failure() {
		let body = br#"{"error":{"message":"mock_error"},"error_description":"mock_error_description"}"#;

		match map(parse_failure(body), Some(500)) {
			Error::IdentityProvider(err) => {
				assert_eq!(err.message, "mock_error");
				assert_eq!(err.status, Some(500));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn unrecognized_bodies_surface_parse_errors() {
		assert!(matches!(
			map(parse_failure(br#"{"foo":"bar"}"#), Some(200)),
			Error::ResponseParse { status: Some(200), .. }
		));
		assert!(matches!(
			map(parse_failure(b"<html>oops</html>"), Some(502)),
			Error::ResponseParse { status: Some(502), .. }
		));
	}

	#[test]
	fn other_failures_become_unexpected_responses() {
		let err = map(RequestTokenError::Other("Unexpected content type.".into()), None);

		assert!(matches!(err, Error::UnexpectedResponse { status: None, .. }));
	}

	#[test]
	fn token_response_keeps_extra_values() {
		let before = OffsetDateTime::now_utc();
		let token = map_token_response(
			&Thirtysevensignals::new(),
			token_response(json!({
				"access_token": "mock_access_token",
				"token_type": "bearer",
				"expires_in": 3600,
				"refresh_token": "mock_refresh_token",
				"scopes": ["read", "write"]
			})),
		)
		.expect("Token response should map.");
		let expires_at = token.expires_at().expect("Expiry should be set.");

		assert_eq!(token.token().expose(), "mock_access_token");
		assert_eq!(token.refresh_token().map(|secret| secret.expose()), Some("mock_refresh_token"));
		assert!(expires_at >= before + Duration::seconds(3600));
		assert!(expires_at <= OffsetDateTime::now_utc() + Duration::seconds(3600));
		assert_eq!(token.resource_owner_id(), None);
		assert_eq!(token.values()["token_type"], "bearer");
		assert_eq!(token.values()["scopes"], json!(["read", "write"]));
		assert!(!token.values().contains_key("access_token"));
	}

	#[test]
	fn token_response_without_expiry_never_expires() {
		let token = map_token_response(
			&Thirtysevensignals::new(),
			token_response(json!({ "access_token": "mock_access_token", "token_type": "bearer" })),
		)
		.expect("Token response should map.");

		assert_eq!(token.expires_at(), None);
		assert!(!token.has_expired());
	}

	#[test]
	fn oversized_expires_in_is_rejected() {
		let err = map_token_response(
			&Thirtysevensignals::new(),
			token_response(json!({
				"access_token": "mock_access_token",
				"token_type": "bearer",
				"expires_in": 99_999_999_999_999_u64
			})),
		)
		.expect_err("Expiry beyond the calendar range must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::ExpiresInOutOfRange)));
	}

	#[test]
	fn owner_ids_render_strings_and_numbers() {
		assert_eq!(owner_id(&json!("abc")).as_deref(), Some("abc"));
		assert_eq!(owner_id(&json!(42)).as_deref(), Some("42"));
		assert_eq!(owner_id(&json!({ "id": 42 })), None);
	}
}
