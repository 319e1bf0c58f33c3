//! Google OAuth 2.0 for web server applications.
//!
//! Exchanges and refreshes are form POSTs carrying `grant_type`; revocation and the OpenID
//! userinfo endpoint are both available.

// self
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};
use crate::{
	_prelude::*,
	auth::{ClientCredential, ProviderId, SignInCode, TokenSecret},
	http::HttpTransport,
	oauth::{ProviderClient, ProviderFuture, TransportErrorMapper},
	provider::{Capability, ProviderAdapter, ProviderDescriptor, TokenRequestStyle},
	request::{
		AuthorizationParameters, AuthorizationRequest, DEFAULT_RESPONSE_TYPE, join_scopes,
	},
	store::CredentialStore,
	token::AccessTokenResponse,
};

/// Provider identifier keying Google's credential.
pub const PROVIDER_ID: &str = "google";
/// Authorization endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Token endpoint for exchanges and refreshes.
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
/// Revocation endpoint.
pub const REVOCATION_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";
/// OpenID Connect userinfo endpoint.
pub const USER_INFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
/// `access_type` sent unless the caller overrides it; `offline` makes Google issue a refresh token.
pub const DEFAULT_ACCESS_TYPE: &str = "offline";

/// Adapter backed by a reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestGoogleAdapter = GoogleAdapter<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Canonical Google descriptor.
pub fn descriptor() -> Result<ProviderDescriptor> {
	Ok(ProviderDescriptor::builder(ProviderId::new(PROVIDER_ID)?)
		.authorization_endpoint(Url::parse(AUTHORIZATION_ENDPOINT)?)
		.token_endpoint(Url::parse(TOKEN_ENDPOINT)?)
		.revocation_endpoint(Url::parse(REVOCATION_ENDPOINT)?)
		.user_info_endpoint(Url::parse(USER_INFO_ENDPOINT)?)
		.support_all(Capability::ALL)
		.token_request_style(TokenRequestStyle::FormPost)
		.build()?)
}

/// Google authorization request.
///
/// See <https://developers.google.com/identity/protocols/oauth2/web-server>.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoogleAuthorizationRequest {
	/// Redirect URI registered in the Google Cloud console.
	pub redirect_uri: String,
	/// Requested scopes, joined with a space.
	pub scopes: Vec<String>,
	/// OAuth response type; `code` by default.
	pub response_type: String,
	/// Anti-CSRF state.
	pub state: Option<String>,
	/// `online` or `offline`; defaults to [`DEFAULT_ACCESS_TYPE`].
	pub access_type: Option<String>,
	/// Enables incremental authorization.
	pub include_granted_scopes: Option<bool>,
	/// Email address or `sub` identifier used to prefill the sign-in form.
	pub login_hint: Option<String>,
	/// Space-delimited list of prompts (`none`, `consent`, `select_account`).
	pub prompt: Option<String>,
}
impl GoogleAuthorizationRequest {
	/// Creates a request with Google's defaults (`response_type=code`, `access_type=offline`).
	pub fn new<I, S>(redirect_uri: impl Into<String>, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			redirect_uri: redirect_uri.into(),
			scopes: scopes.into_iter().map(Into::into).collect(),
			response_type: DEFAULT_RESPONSE_TYPE.into(),
			state: None,
			access_type: Some(DEFAULT_ACCESS_TYPE.into()),
			include_granted_scopes: None,
			login_hint: None,
			prompt: None,
		}
	}

	/// Sets the anti-CSRF state.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Overrides the access type; `None` omits the parameter.
	pub fn with_access_type(mut self, access_type: Option<String>) -> Self {
		self.access_type = access_type;

		self
	}

	/// Sets `include_granted_scopes`.
	pub fn with_include_granted_scopes(mut self, include: bool) -> Self {
		self.include_granted_scopes = Some(include);

		self
	}

	/// Sets the login hint.
	pub fn with_login_hint(mut self, login_hint: impl Into<String>) -> Self {
		self.login_hint = Some(login_hint.into());

		self
	}

	/// Sets the prompt list.
	pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());

		self
	}
}
impl AuthorizationRequest for GoogleAuthorizationRequest {
	const SCOPE_DELIMITER: char = ' ';

	fn redirect_uri(&self) -> &str {
		&self.redirect_uri
	}

	fn build_parameters(&self, client_id: &str) -> AuthorizationParameters {
		let mut params = AuthorizationParameters::base(
			client_id,
			&self.redirect_uri,
			&self.response_type,
			join_scopes(&self.scopes, Self::SCOPE_DELIMITER),
		);

		params.push_present("state", self.state.as_deref());
		params.push_present("access_type", self.access_type.as_deref());

		if let Some(include) = self.include_granted_scopes {
			params.push("include_granted_scopes", include.to_string());
		}

		params.push_present("login_hint", self.login_hint.as_deref());
		params.push_present("prompt", self.prompt.as_deref());

		params
	}
}

/// Google token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GoogleAccessTokenResponse {
	/// Access token.
	pub access_token: TokenSecret,
	/// Token type, `Bearer`.
	pub token_type: String,
	/// Remaining lifetime in seconds.
	pub expires_in: u64,
	/// Space-delimited granted scopes.
	#[serde(default)]
	pub scope: Option<String>,
	/// Refresh token, issued for `access_type=offline` on first consent.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// OpenID Connect ID token when `openid` was requested. Not validated here.
	#[serde(default)]
	pub id_token: Option<TokenSecret>,
	/// Remaining refresh token lifetime in seconds, for time-limited grants.
	#[serde(default)]
	pub refresh_token_expires_in: Option<u64>,
}
impl AccessTokenResponse for GoogleAccessTokenResponse {
	fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	fn token_type(&self) -> &str {
		&self.token_type
	}

	fn expires_in(&self) -> u64 {
		self.expires_in
	}

	fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}
}

/// Google adapter: code exchange, refresh, revocation, and userinfo lookups.
pub struct GoogleAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: ProviderClient<C, M>,
}
impl<C, M> GoogleAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an adapter for the canonical descriptor.
	pub fn new(
		credential: ClientCredential,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		Ok(Self::with_descriptor(descriptor()?, credential, http_client, transport_mapper))
	}

	/// Creates an adapter for the canonical descriptor, resolving the credential from `store`.
	pub fn from_store(
		store: &dyn CredentialStore,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let client =
			ProviderClient::from_store(descriptor()?, store, http_client, transport_mapper)?;

		Ok(Self { client })
	}

	/// Creates an adapter for a custom descriptor (proxies, mock servers).
	pub fn with_descriptor(
		descriptor: ProviderDescriptor,
		credential: ClientCredential,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { client: ProviderClient::new(descriptor, credential, http_client, transport_mapper) }
	}

	/// Underlying provider client.
	pub fn client(&self) -> &ProviderClient<C, M> {
		&self.client
	}
}
impl<C, M> Debug for GoogleAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GoogleAdapter").field("client", &self.client).finish()
	}
}
#[cfg(feature = "reqwest")]
impl ReqwestGoogleAdapter {
	/// Creates an adapter over a default reqwest client.
	pub fn with_reqwest(credential: ClientCredential) -> Result<Self> {
		Self::new(credential, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> ProviderAdapter for GoogleAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	type Request = GoogleAuthorizationRequest;
	type Token = GoogleAccessTokenResponse;

	fn descriptor(&self) -> &ProviderDescriptor {
		self.client.descriptor()
	}

	fn authorization_uri(&self, request: &Self::Request) -> Result<Url> {
		self.client.authorization_uri(request)
	}

	fn exchange_code<'a>(
		&'a self,
		code: &'a SignInCode,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, Self::Token> {
		self.client.exchange_code(code, cancel)
	}

	fn refresh_access_token<'a>(
		&'a self,
		refresh_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, Self::Token> {
		self.client.refresh_token(refresh_token, cancel)
	}

	fn revoke_access_token<'a>(
		&'a self,
		access_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, ()> {
		self.client.revoke_token(access_token, cancel)
	}

	fn fetch_user<'a, P>(
		&'a self,
		access_token: &'a str,
		fields: &'a [&'a str],
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, P>
	where
		P: 'a + Send + DeserializeOwned,
	{
		self.client.fetch_user(access_token, fields, cancel)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn build_parameters_emits_fields_in_order() {
		let request = GoogleAuthorizationRequest::new("https://app/cb", ["email", "profile"])
			.with_state("s1")
			.with_include_granted_scopes(true)
			.with_login_hint("ada@example.com")
			.with_prompt("consent");
		let params = request.build_parameters("abc");

		assert_eq!(
			params.keys(),
			[
				"client_id",
				"redirect_uri",
				"response_type",
				"scope",
				"state",
				"access_type",
				"include_granted_scopes",
				"login_hint",
				"prompt",
			]
		);
		assert_eq!(params.get("scope"), Some("email profile"));
		assert_eq!(params.get("access_type"), Some("offline"));
		assert_eq!(params.get("include_granted_scopes"), Some("true"));
		assert_eq!(params, request.build_parameters("abc"));
	}

	#[test]
	fn optional_fields_are_omitted_when_unset() {
		let request = GoogleAuthorizationRequest::new("https://app/cb", Vec::<String>::new())
			.with_access_type(None)
			.with_include_granted_scopes(false);
		let params = request.build_parameters("abc");

		assert_eq!(
			params.keys(),
			["client_id", "redirect_uri", "response_type", "scope", "include_granted_scopes"]
		);
		assert_eq!(params.get("scope"), Some(""));
		assert_eq!(params.get("include_granted_scopes"), Some("false"));
	}

	#[test]
	fn canonical_descriptor_offers_everything() {
		let descriptor = descriptor().expect("Google descriptor should build.");

		assert_eq!(descriptor.id.as_str(), PROVIDER_ID);
		assert!(Capability::ALL.into_iter().all(|capability| descriptor.supports(capability)));
		assert_eq!(descriptor.endpoints.token.as_str(), TOKEN_ENDPOINT);
		assert_eq!(descriptor.quirks.token_request_style, TokenRequestStyle::FormPost);
		assert!(descriptor.quirks.send_grant_type);
	}

	#[test]
	fn token_response_decodes_optional_fields() {
		let token: GoogleAccessTokenResponse = serde_json::from_str(
			r#"{"access_token":"tok1","token_type":"Bearer","expires_in":3599,
				"scope":"openid email","refresh_token":"ref1","id_token":"eyJ"}"#,
		)
		.expect("Google token should deserialize.");

		assert_eq!(token.token_type(), "Bearer");
		assert_eq!(token.refresh_token().map(TokenSecret::expose), Some("ref1"));
		assert_eq!(token.scope(), Some("openid email"));
		assert_eq!(token.refresh_token_expires_in, None);
	}
}
