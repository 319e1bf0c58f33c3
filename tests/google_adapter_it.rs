#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_social::{
	_preludet::*,
	auth::{SignInCode, TokenSecret},
	obs::Operation,
	provider::{
		Capability, GoogleAuthorizationRequest, ProviderAdapter, google::ReqwestGoogleAdapter,
	},
	token::AccessTokenResponse,
};

const REDIRECT_URI: &str = "https://app.example/cb";

#[derive(Debug, Deserialize)]
struct GoogleUser {
	sub: String,
	email: String,
}

fn build_adapter(server: &MockServer) -> ReqwestGoogleAdapter {
	let descriptor = rebase_descriptor(
		oauth2_social::provider::google::descriptor()
			.expect("Google descriptor should build successfully."),
		&server.base_url(),
	);

	ReqwestGoogleAdapter::with_descriptor(
		descriptor,
		test_credential(),
		test_reqwest_http_client(),
		test_transport_mapper(),
	)
}

#[test]
fn authorization_uri_carries_every_parameter() {
	let adapter = ReqwestGoogleAdapter::with_reqwest(test_credential())
		.expect("Google adapter should build with the canonical descriptor.");
	let request =
		GoogleAuthorizationRequest::new(REDIRECT_URI, ["email", "profile"]).with_state("s1");
	let url = adapter.authorization_uri(&request).expect("Authorization URL should build.");
	let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

	assert_eq!(url.host_str(), Some("accounts.google.com"));
	assert!(pairs.contains(&("client_id".into(), TEST_CLIENT_ID.into())));
	assert!(pairs.contains(&("redirect_uri".into(), REDIRECT_URI.into())));
	assert!(pairs.contains(&("response_type".into(), "code".into())));
	assert!(pairs.contains(&("scope".into(), "email profile".into())));
	assert!(pairs.contains(&("state".into(), "s1".into())));
	assert!(pairs.contains(&("access_type".into(), "offline".into())));
	assert_eq!(
		url,
		adapter.authorization_uri(&request).expect("Authorization URL should build twice.")
	);
}

#[test]
fn authorization_uri_rejects_relative_redirects() {
	let adapter = ReqwestGoogleAdapter::with_reqwest(test_credential())
		.expect("Google adapter should build with the canonical descriptor.");

	for redirect in ["", "/cb"] {
		let err = adapter
			.authorization_uri(&GoogleAuthorizationRequest::new(redirect, ["email"]))
			.expect_err("Non-absolute redirect URIs should be rejected.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}.");
	}
}

#[tokio::test]
async fn exchange_code_decodes_the_code_once() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("code", "X/Y")
				.form_urlencoded_tuple("client_id", TEST_CLIENT_ID)
				.form_urlencoded_tuple("client_secret", TEST_CLIENT_SECRET)
				.form_urlencoded_tuple("redirect_uri", REDIRECT_URI)
				.form_urlencoded_tuple("grant_type", "authorization_code");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"tok1\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"refresh_token\":\"ref1\",\"scope\":\"email profile\"}",
			);
		})
		.await;
	let code = SignInCode::new("X%2FY", "s1").with_redirect_uri(REDIRECT_URI);
	let token = adapter.exchange_code(&code, None).await.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token().expose(), "tok1");
	assert_eq!(token.token_type(), "Bearer");
	assert_eq!(token.expires_in(), 3600);
	assert_eq!(token.refresh_token(), Some(&TokenSecret::new("ref1")));
	assert_eq!(token.scope(), Some("email profile"));
}

#[tokio::test]
async fn exchange_code_surfaces_provider_rejections() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let err = adapter
		.exchange_code(&SignInCode::new("stale", "s1"), None)
		.await
		.expect_err("Rejected codes should fail.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Server { operation: Operation::ExchangeCode, status: 400, ref body, .. }
			if body == "{\"error\":\"invalid_grant\"}"
	));
	assert_eq!(err.oauth_error().map(|body| body.error), Some("invalid_grant".into()));
}

#[tokio::test]
async fn exchange_code_reports_malformed_success_bodies() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await;
	let err = adapter
		.exchange_code(&SignInCode::new("abc", "s1"), None)
		.await
		.expect_err("Bodies without an access token should fail to decode.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Decode { operation: Operation::ExchangeCode, status: 200, .. }));
}

#[tokio::test]
async fn refresh_posts_the_refresh_grant() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.form_urlencoded_tuple("refresh_token", "ref1")
				.form_urlencoded_tuple("client_id", TEST_CLIENT_ID)
				.form_urlencoded_tuple("client_secret", TEST_CLIENT_SECRET)
				.form_urlencoded_tuple("grant_type", "refresh_token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"tok2\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let token =
		adapter.refresh_access_token("ref1", None).await.expect("Refresh should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token().expose(), "tok2");
	assert!(token.refresh_token().is_none());
}

#[tokio::test]
async fn refresh_rejects_empty_tokens_without_calling_out() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.path("/token");
			then.status(500);
		})
		.await;
	let err = adapter
		.refresh_access_token("", None)
		.await
		.expect_err("Empty refresh tokens should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn revoke_succeeds_on_ok_and_fails_otherwise() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let ok = server
		.mock_async(|when, then| {
			when.method(POST).path("/revoke").form_urlencoded_tuple("token", "tok1");
			then.status(200);
		})
		.await;

	adapter.revoke_access_token("tok1", None).await.expect("Revocation should succeed.");
	ok.assert_async().await;

	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/revoke").form_urlencoded_tuple("token", "gone");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_token\"}");
		})
		.await;
	let err = adapter
		.revoke_access_token("gone", None)
		.await
		.expect_err("Unknown tokens should fail revocation.");

	rejected.assert_async().await;

	assert!(matches!(
		err,
		Error::Server { operation: Operation::RevokeToken, status: 400, .. }
	));
}

#[tokio::test]
async fn fetch_user_sends_a_bearer_token() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/v3/userinfo").header("authorization", "Bearer tok1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"sub\":\"1234\",\"email\":\"ada@example.com\",\"email_verified\":true}");
		})
		.await;
	let user = adapter
		.fetch_user::<GoogleUser>("tok1", &[], None)
		.await
		.expect("Userinfo lookup should succeed.");

	mock.assert_async().await;

	assert_eq!(user.sub, "1234");
	assert_eq!(user.email, "ada@example.com");
	assert!(adapter.supports(Capability::FetchUser));
}

#[tokio::test]
async fn fetch_user_reports_expired_tokens() {
	let server = MockServer::start_async().await;
	let adapter = build_adapter(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/v3/userinfo");
			then.status(401).body("{\"error\":\"invalid_token\"}");
		})
		.await;
	let err = adapter
		.fetch_user::<GoogleUser>("expired", &[], None)
		.await
		.expect_err("Expired tokens should be rejected.");

	mock.assert_async().await;

	assert_eq!(err.status(), Some(401));
	assert_eq!(err.operation(), Some(Operation::FetchUser));
}
