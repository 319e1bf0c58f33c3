//! The contract every provider adapter implements.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, SignInCode},
	oauth::ProviderFuture,
	provider::{Capabilities, Capability, ProviderDescriptor},
	request::AuthorizationRequest,
	token::AccessTokenResponse,
};

/// Uniform surface over Google, Facebook, Mercado Livre, and any provider added later.
///
/// Callers branch only on which adapter they hold and on [`supports`](Self::supports). Operations
/// a provider lacks keep the default bodies, which fail with [`Error::NotSupported`] without
/// touching the network. Network-bound operations accept an optional [`CancellationToken`];
/// once it fires the in-flight request is dropped and the call fails with
/// [`Error::Cancelled`].
pub trait ProviderAdapter
where
	Self: Send + Sync,
{
	/// Typed authorization request accepted by [`authorization_uri`](Self::authorization_uri).
	type Request: AuthorizationRequest;
	/// Typed token response produced by exchanges and refreshes.
	type Token: AccessTokenResponse;

	/// Descriptor holding endpoints, capabilities, and quirks.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Identifier of the provider.
	fn provider_id(&self) -> &ProviderId {
		&self.descriptor().id
	}

	/// Operations this adapter offers.
	fn capabilities(&self) -> Capabilities {
		self.descriptor().capabilities
	}

	/// Returns `true` when `capability` is offered.
	fn supports(&self, capability: Capability) -> bool {
		self.capabilities().supports(capability)
	}

	/// Builds the URL the user agent should be redirected to.
	///
	/// Fails with [`Error::InvalidRequest`] when the redirect URI is empty or not absolute.
	fn authorization_uri(&self, request: &Self::Request) -> Result<Url>;

	/// Exchanges the authorization code carried by `code` for a token.
	///
	/// The code is percent-decoded once before it is sent. `redirect_uri` is sent only when
	/// `code.redirect_uri` is set; providers that bind codes to a redirect URI reject the exchange
	/// otherwise.
	fn exchange_code<'a>(
		&'a self,
		code: &'a SignInCode,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, Self::Token>;

	/// Redeems a refresh token.
	fn refresh_access_token<'a>(
		&'a self,
		refresh_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, Self::Token> {
		let _ = (refresh_token, cancel);

		unsupported(self.provider_id(), Capability::RefreshToken)
	}

	/// Revokes an access token.
	fn revoke_access_token<'a>(
		&'a self,
		access_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, ()> {
		let _ = (access_token, cancel);

		unsupported(self.provider_id(), Capability::RevokeToken)
	}

	/// Fetches the authenticated user's profile, decoded into the caller's type `P`.
	fn fetch_user<'a, P>(
		&'a self,
		access_token: &'a str,
		fields: &'a [&'a str],
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, P>
	where
		P: 'a + Send + DeserializeOwned,
	{
		let _ = (access_token, fields, cancel);

		unsupported(self.provider_id(), Capability::FetchUser)
	}
}

fn unsupported<'a, T>(provider: &ProviderId, capability: Capability) -> ProviderFuture<'a, T>
where
	T: 'a + Send,
{
	Box::pin(std::future::ready(Err(Error::not_supported(provider, capability))))
}
