//! 37signals Launchpad provider for OAuth 2.0 clients: build authorization URLs, exchange
//! authorization codes, and parse resource-owner profiles into typed users on top of the `oauth2`
//! crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ClientConfig,
		flows::{Client, ThirtysevensignalsClient},
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::Thirtysevensignals,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ThirtysevensignalsClient;

	/// Client identifier shared by test fixtures.
	pub const TEST_CLIENT_ID: &str = "mock_client_id";
	/// Client secret shared by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "mock_client_secret";
	/// Redirect URI shared by test fixtures.
	pub const TEST_REDIRECT_URI: &str = "https://app.example.com/redirect_url";

	/// Builds the client configuration used across tests.
	pub fn test_config() -> ClientConfig {
		ClientConfig::builder(TEST_CLIENT_ID)
			.client_secret(TEST_CLIENT_SECRET)
			.redirect_uri(
				Url::parse(TEST_REDIRECT_URI).expect("Test redirect URI fixture should parse."),
			)
			.build()
			.expect("Test client configuration should be valid.")
	}

	/// Builds a reqwest HTTP client that, like the production default, never follows redirects.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] whose Launchpad endpoints resolve against `base_url` (usually an
	/// `httpmock` server).
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestTestClient {
		let base = Url::parse(base_url).expect("Mock server base URL should parse.");
		let provider = Thirtysevensignals::with_base_url(base)
			.expect("Mock server base URL should be usable as a Launchpad base.");

		Client::with_http_client(
			test_config(),
			provider,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};

pub use config::ClientConfig;
pub use flows::{AuthorizationOptions, AuthorizationRequest, Client};
pub use provider::{Provider, Thirtysevensignals, ThirtysevensignalsUser};
