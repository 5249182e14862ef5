#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_thirtysevensignals::{_preludet::*, auth::AccessToken, provider::ResourceOwner};

const PROFILE_BODY: &str = r#"{
	"expires_at": "2016-09-01T04:33:30.000Z",
	"identity": {
		"id": 1234,
		"email_address": "jason@example.com",
		"first_name": "Jason",
		"last_name": "Fried"
	},
	"accounts": [
		{
			"id": 1234,
			"name": "Base Camp Test",
			"product": "bc3",
			"href": "https://3.basecampapi.com/1234",
			"app_href": "https://3.basecamp.com/1234"
		}
	]
}"#;

fn access_token() -> AccessToken {
	AccessToken::builder("mock_access_token")
		.expires_in(Duration::seconds(3600))
		.build()
		.expect("Access token fixture should build.")
}

#[tokio::test]
async fn resource_owner_is_parsed_from_authorization_json() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/authorization.json")
				.header("authorization", "Bearer mock_access_token")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let user = client
		.resource_owner(&access_token())
		.await
		.expect("Resource owner fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id(), Some(1234));
	assert_eq!(user.resource_owner_id().as_deref(), Some("1234"));
	assert_eq!(user.email(), Some("jason@example.com"));
	assert_eq!(user.first_name(), Some("Jason"));
	assert_eq!(user.last_name(), Some("Fried"));
	assert_eq!(user.name().as_deref(), Some("Jason Fried"));
	assert_eq!(user.accounts()[0].product, "bc3");

	let raw = user.to_value();

	assert_eq!(raw["identity"]["email_address"], "jason@example.com");
	assert_eq!(raw["expires_at"], "2016-09-01T04:33:30.000Z");
	assert_eq!(raw["accounts"][0]["name"], "Base Camp Test");
}

#[tokio::test]
async fn only_recognized_error_shapes_fail() {
	let payloads = [
		"{\"error\":\"mock_error\",\"error_description\":\"mock_error_description\"}",
		"{\"error\":{\"message\":\"mock_error\"},\"error_description\":\"mock_error_description\"}",
		"{\"foo\":\"bar\"}",
	];
	let mut failures = 0;

	for body in payloads {
		let server = MockServer::start_async().await;
		let client = build_reqwest_test_client(&server.base_url());

		server
			.mock_async(|when, then| {
				when.method(GET).path("/authorization.json");
				then.status(500).header("content-type", "application/json").body(body);
			})
			.await;

		match client.resource_owner(&access_token()).await {
			Err(Error::IdentityProvider(err)) => {
				assert_eq!(err.message, "mock_error");
				assert_eq!(err.status, Some(500));
				assert_eq!(err.body, body);

				failures += 1;
			},
			Err(other) => panic!("Unexpected error variant for {body}: {other:?}."),
			Ok(user) => assert_eq!(user.id(), None),
		}
	}

	assert_eq!(failures, 2);
}

#[tokio::test]
async fn non_json_profile_is_a_parse_error() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(GET).path("/authorization.json");
			then.status(502).header("content-type", "text/html").body("<html>Bad gateway</html>");
		})
		.await;

	let err = client
		.resource_owner(&access_token())
		.await
		.expect_err("HTML bodies must not parse as a profile.");

	assert!(matches!(err, Error::ResponseParse { status: Some(502), .. }));
}

#[tokio::test]
async fn mistyped_profile_reports_status() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(GET).path("/authorization.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"identity\":{\"id\":\"1234\"}}");
		})
		.await;

	match client.resource_owner(&access_token()).await {
		Err(Error::ResponseParse { source, status }) => {
			assert_eq!(status, Some(200));
			assert_eq!(source.path().to_string(), "identity.id");
		},
		other => panic!("Unexpected outcome: {other:?}."),
	}
}

#[tokio::test]
async fn profile_with_trailing_data_is_a_parse_error() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(GET).path("/authorization.json");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{PROFILE_BODY} <!-- cached -->"));
		})
		.await;

	let err = client
		.resource_owner(&access_token())
		.await
		.expect_err("Bytes after the profile document must be rejected.");

	assert!(matches!(err, Error::ResponseParse { status: Some(200), .. }));
}

#[tokio::test]
async fn array_profile_is_not_a_provider_error() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(GET).path("/authorization.json");
			then.status(500).header("content-type", "application/json").body("[\"mock_error\"]");
		})
		.await;

	let err = client
		.resource_owner(&access_token())
		.await
		.expect_err("A JSON array is not a profile document.");

	assert!(matches!(err, Error::ResponseParse { status: Some(500), .. }));
}
