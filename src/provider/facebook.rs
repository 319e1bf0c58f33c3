//! Facebook Login manual flow.
//!
//! The Graph API takes code exchanges as a `GET` with every parameter in the query string and no
//! `grant_type`. Facebook has no refresh-token grant and no revocation endpoint, so only the
//! exchange and Graph `/me` lookups are offered.

// self
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};
use crate::{
	_prelude::*,
	auth::{ClientCredential, ProviderId, SignInCode, TokenSecret},
	http::HttpTransport,
	oauth::{ProviderClient, ProviderFuture, TransportErrorMapper},
	provider::{Capability, ProviderAdapter, ProviderDescriptor, ProviderQuirks, TokenRequestStyle},
	request::{
		AuthorizationParameters, AuthorizationRequest, DEFAULT_RESPONSE_TYPE, join_scopes,
	},
	store::CredentialStore,
	token::AccessTokenResponse,
};

/// Provider identifier keying Facebook's credential.
pub const PROVIDER_ID: &str = "facebook";
/// Login dialog endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://www.facebook.com/dialog/oauth";
/// Graph API token endpoint.
pub const TOKEN_ENDPOINT: &str = "https://graph.facebook.com/oauth/access_token";
/// Graph API endpoint for the authenticated user.
pub const USER_INFO_ENDPOINT: &str = "https://graph.facebook.com/me";

/// Adapter backed by a reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestFacebookAdapter = FacebookAdapter<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Canonical Facebook descriptor.
pub fn descriptor() -> Result<ProviderDescriptor> {
	Ok(ProviderDescriptor::builder(ProviderId::new(PROVIDER_ID)?)
		.authorization_endpoint(Url::parse(AUTHORIZATION_ENDPOINT)?)
		.token_endpoint(Url::parse(TOKEN_ENDPOINT)?)
		.user_info_endpoint(Url::parse(USER_INFO_ENDPOINT)?)
		.support_all([Capability::ExchangeCode, Capability::FetchUser])
		.quirks(ProviderQuirks {
			token_request_style: TokenRequestStyle::QueryGet,
			send_grant_type: false,
			user_fields_param: true,
		})
		.build()?)
}

/// Facebook login dialog request.
///
/// See <https://developers.facebook.com/docs/facebook-login/guides/advanced/manual-flow>.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacebookAuthorizationRequest {
	/// Redirect URI registered for the app.
	pub redirect_uri: String,
	/// Requested permissions, joined with a comma.
	pub scopes: Vec<String>,
	/// OAuth response type; `code` by default.
	pub response_type: String,
	/// Anti-CSRF state.
	pub state: Option<String>,
}
impl FacebookAuthorizationRequest {
	/// Creates a request with `response_type=code`.
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
		}
	}

	/// Sets the anti-CSRF state.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}
}
impl AuthorizationRequest for FacebookAuthorizationRequest {
	const SCOPE_DELIMITER: char = ',';

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

		params
	}
}

/// Graph API token response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FacebookAccessTokenResponse {
	/// User access token.
	pub access_token: TokenSecret,
	/// Token type, `bearer`.
	pub token_type: String,
	/// Remaining lifetime in seconds.
	pub expires_in: u64,
}
impl AccessTokenResponse for FacebookAccessTokenResponse {
	fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	fn token_type(&self) -> &str {
		&self.token_type
	}

	fn expires_in(&self) -> u64 {
		self.expires_in
	}
}

/// Facebook adapter: code exchange and Graph `/me` lookups.
pub struct FacebookAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: ProviderClient<C, M>,
}
impl<C, M> FacebookAdapter<C, M>
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
impl<C, M> Debug for FacebookAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FacebookAdapter").field("client", &self.client).finish()
	}
}
#[cfg(feature = "reqwest")]
impl ReqwestFacebookAdapter {
	/// Creates an adapter over a default reqwest client.
	pub fn with_reqwest(credential: ClientCredential) -> Result<Self> {
		Self::new(credential, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> ProviderAdapter for FacebookAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	type Request = FacebookAuthorizationRequest;
	type Token = FacebookAccessTokenResponse;

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
