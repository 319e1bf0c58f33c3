//! Mercado Livre (Mercado Libre) OAuth 2.0.
//!
//! Exchanges and refreshes are form POSTs carrying `grant_type`. Refresh tokens are only issued
//! when the app requests the `offline_access` scope.

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

/// Provider identifier keying Mercado Livre's credential.
pub const PROVIDER_ID: &str = "mercado-livre";
/// Brazilian authorization endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://auth.mercadolivre.com.br/authorization";
/// Token endpoint for exchanges and refreshes.
pub const TOKEN_ENDPOINT: &str = "https://api.mercadolibre.com/oauth/token";

/// Adapter backed by a reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestMercadoLivreAdapter =
	MercadoLivreAdapter<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Canonical Mercado Livre descriptor.
pub fn descriptor() -> Result<ProviderDescriptor> {
	Ok(ProviderDescriptor::builder(ProviderId::new(PROVIDER_ID)?)
		.authorization_endpoint(Url::parse(AUTHORIZATION_ENDPOINT)?)
		.token_endpoint(Url::parse(TOKEN_ENDPOINT)?)
		.support_all([Capability::ExchangeCode, Capability::RefreshToken])
		.token_request_style(TokenRequestStyle::FormPost)
		.build()?)
}

/// Mercado Livre authorization request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MercadoLivreAuthorizationRequest {
	/// Redirect URI registered for the application.
	pub redirect_uri: String,
	/// Requested scopes, joined with a space (`offline_access read write`).
	pub scopes: Vec<String>,
	/// OAuth response type; `code` by default.
	pub response_type: String,
	/// Anti-CSRF state.
	pub state: Option<String>,
}
impl MercadoLivreAuthorizationRequest {
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
impl AuthorizationRequest for MercadoLivreAuthorizationRequest {
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

		params
	}
}

/// Mercado Livre token response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MercadoLivreAccessTokenResponse {
	/// Access token.
	pub access_token: TokenSecret,
	/// Token type, `Bearer`.
	pub token_type: String,
	/// Remaining lifetime in seconds (six hours at the time of writing).
	pub expires_in: u64,
	/// Space-delimited granted scopes.
	#[serde(default)]
	pub scope: String,
	/// Seller or buyer id the token acts for.
	pub user_id: u64,
	/// Single-use refresh token, present when `offline_access` was granted.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
}
impl AccessTokenResponse for MercadoLivreAccessTokenResponse {
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
		Some(&self.scope).filter(|scope| !scope.is_empty()).map(String::as_str)
	}
}

/// Mercado Livre adapter: code exchange and refresh.
pub struct MercadoLivreAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: ProviderClient<C, M>,
}
impl<C, M> MercadoLivreAdapter<C, M>
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

	/// Creates an adapter for a custom descriptor (regional hosts, proxies, mock servers).
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
impl<C, M> Debug for MercadoLivreAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MercadoLivreAdapter").field("client", &self.client).finish()
	}
}
#[cfg(feature = "reqwest")]
impl ReqwestMercadoLivreAdapter {
	/// Creates an adapter over a default reqwest client.
	pub fn with_reqwest(credential: ClientCredential) -> Result<Self> {
		Self::new(credential, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> ProviderAdapter for MercadoLivreAdapter<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	type Request = MercadoLivreAuthorizationRequest;
	type Token = MercadoLivreAccessTokenResponse;

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
}
