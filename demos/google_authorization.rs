//! Walks through a Google sign-in against a local mock: build the authorization URL with a fresh
//! state, accept the callback, exchange the code, then read the user's profile.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use oauth2_social::{
	auth::{ClientCredential, ProviderId, SignInCode},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{
		GoogleAuthorizationRequest, ProviderAdapter,
		google::{self, ReqwestGoogleAdapter},
	},
	request::AuthorizationState,
	store::{CredentialStore, MemoryCredentialStore},
	token::AccessTokenResponse,
	url::Url,
};

#[derive(Debug, Deserialize)]
struct Profile {
	sub: String,
	email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").form_urlencoded_tuple("code", "4/0Ab-demo");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"ya29.demo\",\"token_type\":\"Bearer\",\"expires_in\":3599,\"refresh_token\":\"1//demo\",\"scope\":\"openid email\"}",
			);
		})
		.await;
	let userinfo_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth2/v3/userinfo")
				.header("authorization", "Bearer ya29.demo");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"sub\":\"110169484474386276334\",\"email\":\"demo@example.com\"}");
		})
		.await;
	let provider = ProviderId::new(google::PROVIDER_ID)?;
	let store = MemoryCredentialStore::default().with_credential(
		provider.clone(),
		ClientCredential::new("demo-client.apps.googleusercontent.com", "demo-secret"),
	);
	let credential = store.resolve(&provider)?;
	let descriptor = google::descriptor()?.with_origin(&Url::parse(&server.base_url())?)?;
	let adapter = ReqwestGoogleAdapter::with_descriptor(
		descriptor,
		credential,
		ReqwestHttpClient::default(),
		ReqwestTransportErrorMapper,
	);
	let state = AuthorizationState::generate();
	let redirect_uri = "https://app.example/oauth/google/callback";
	let url = adapter.authorization_uri(
		&GoogleAuthorizationRequest::new(redirect_uri, ["openid", "email"])
			.with_state(state.as_str())
			.with_prompt("consent"),
	)?;

	println!("Send the user agent to: {url}");

	// The callback delivers the code percent-encoded, exactly as it appeared in the query string.
	let callback =
		SignInCode::new("4%2F0Ab-demo", state.as_str()).with_redirect_uri(redirect_uri);

	callback.verify_state(state.as_str())?;

	let token = adapter.exchange_code(&callback, None).await?;

	token_mock.assert_async().await;
	println!(
		"Access token expires in {}s; refresh token issued: {}.",
		token.expires_in(),
		token.refresh_token().is_some()
	);

	let profile = adapter.fetch_user::<Profile>(token.access_token().expose(), &[], None).await?;

	userinfo_mock.assert_async().await;
	println!("Signed in as {} ({}).", profile.email, profile.sub);

	Ok(())
}
