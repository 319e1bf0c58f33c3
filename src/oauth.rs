//! Provider call engine shared by every adapter.
//!
//! [`ProviderClient`] turns a [`ProviderDescriptor`] plus a resolved [`ClientCredential`] into
//! concrete HTTP requests, dispatches them through an [`HttpTransport`] handle, and normalizes
//! whatever comes back:
//!
//! - transport failures go through a [`TransportErrorMapper`],
//! - non-2xx responses become [`Error::Server`] with the raw status and body,
//! - 2xx bodies that do not match the expected type become [`Error::Decode`],
//! - a fired [`CancellationToken`] drops the in-flight request and yields [`Error::Cancelled`].
//!
//! Nothing is retried.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderMap, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
	},
};
use time::format_description::well_known::Rfc2822;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredential, SignInCode},
	error::TransportError,
	http::HttpTransport,
	obs::{self, Operation, OperationOutcome, OperationSpan},
	provider::{Capability, ProviderDescriptor, TokenRequestStyle},
	request::{self, AuthorizationRequest},
	store::CredentialStore,
	token::AccessTokenResponse,
};

/// Boxed `Send` future returned by every network-bound adapter operation.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

type Parameters = Vec<(&'static str, String)>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an [`Error`].
	fn map_transport_error(&self, operation: Operation, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() => Error::invalid_request(
				format_args!("the {operation} request could not be built ({inner})"),
			),
			HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
			HttpClientError::Http(inner) => Error::invalid_request(format_args!(
				"the {operation} request could not be built ({inner})"
			)),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			_ => TransportError::Other {
				message: format!("unrecognized transport failure during {operation}"),
			}
			.into(),
		}
	}
}

/// Descriptor-driven client that performs the HTTP side of every adapter operation.
pub struct ProviderClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	descriptor: ProviderDescriptor,
	credential: Arc<ClientCredential>,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
}
impl<C, M> ProviderClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client from an already resolved credential.
	pub fn new(
		descriptor: ProviderDescriptor,
		credential: ClientCredential,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			descriptor,
			credential: Arc::new(credential),
			http_client: http_client.into(),
			transport_mapper: transport_mapper.into(),
		}
	}

	/// Creates a client, resolving the credential for `descriptor.id` from `store`.
	///
	/// A missing entry surfaces as [`Error::CredentialNotFound`].
	pub fn from_store(
		descriptor: ProviderDescriptor,
		store: &dyn CredentialStore,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let credential = store.resolve(&descriptor.id)?;

		Ok(Self::new(descriptor, credential, http_client, transport_mapper))
	}

	/// Descriptor driving this client.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Public client identifier sent with every request.
	pub fn client_id(&self) -> &str {
		&self.credential.client_id
	}

	/// Fails with [`Error::NotSupported`] unless the descriptor enables `capability`.
	pub fn ensure_supported(&self, capability: Capability) -> Result<()> {
		if self.descriptor.supports(capability) {
			Ok(())
		} else {
			Err(Error::not_supported(&self.descriptor.id, capability))
		}
	}

	/// Builds the authorization URL for `request`.
	pub fn authorization_uri<R>(&self, request: &R) -> Result<Url>
	where
		R: AuthorizationRequest,
	{
		let provider = self.descriptor.id.as_str();
		let _guard = OperationSpan::new(provider, Operation::Authorize).entered();

		obs::record_operation_outcome(provider, Operation::Authorize, OperationOutcome::Attempt);

		let result = request::validate_redirect_uri(request.redirect_uri()).map(|_| {
			let mut url = self.descriptor.endpoints.authorization.clone();

			url.query_pairs_mut().extend_pairs(request.build_parameters(self.client_id()).iter());

			url
		});

		obs::record_operation_result(provider, Operation::Authorize, &result);

		result
	}

	/// Exchanges an authorization code for a token response of type `T`.
	pub fn exchange_code<'a, T>(
		&'a self,
		code: &'a SignInCode,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, T>
	where
		T: AccessTokenResponse,
	{
		self.observe(Operation::ExchangeCode, async move {
			self.ensure_supported(Capability::ExchangeCode)?;

			let mut params: Parameters = vec![("code", code.decoded_code()?.into_owned())];

			params.extend(self.client_parameters());

			if let Some(redirect_uri) = code.redirect_uri.as_deref() {
				params.push(("redirect_uri", redirect_uri.to_owned()));
			}
			if self.descriptor.quirks.send_grant_type {
				params.push(("grant_type", "authorization_code".into()));
			}

			let endpoint = &self.descriptor.endpoints.token;
			let request = match self.descriptor.quirks.token_request_style {
				TokenRequestStyle::FormPost => form_post(endpoint, &params)?,
				TokenRequestStyle::QueryGet => {
					let mut url = endpoint.clone();

					url.query_pairs_mut().extend_pairs(params.iter());

					get(&url, None)?
				},
			};

			self.execute_json(Operation::ExchangeCode, request, cancel).await
		})
	}

	/// Redeems a refresh token for a new token response of type `T`.
	pub fn refresh_token<'a, T>(
		&'a self,
		refresh_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, T>
	where
		T: AccessTokenResponse,
	{
		self.observe(Operation::RefreshToken, async move {
			self.ensure_supported(Capability::RefreshToken)?;
			require_non_empty("refresh token", refresh_token)?;

			let mut params: Parameters = vec![("refresh_token", refresh_token.to_owned())];

			params.extend(self.client_parameters());
			params.push(("grant_type", "refresh_token".into()));

			let request = form_post(&self.descriptor.endpoints.token, &params)?;

			self.execute_json(Operation::RefreshToken, request, cancel).await
		})
	}

	/// Revokes `access_token` at the revocation endpoint.
	pub fn revoke_token<'a>(
		&'a self,
		access_token: &'a str,
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, ()> {
		self.observe(Operation::RevokeToken, async move {
			self.ensure_supported(Capability::RevokeToken)?;
			require_non_empty("access token", access_token)?;

			let endpoint = self
				.descriptor
				.endpoints
				.revocation
				.as_ref()
				.ok_or_else(|| Error::not_supported(&self.descriptor.id, Capability::RevokeToken))?;
			let request = form_post(endpoint, &[("token", access_token.to_owned())])?;
			let response = self.execute(Operation::RevokeToken, request, cancel).await?;

			ensure_success(Operation::RevokeToken, response).map(|_| ())
		})
	}

	/// Fetches the authenticated user's profile and decodes it into `P`.
	///
	/// `fields` is forwarded only for providers whose descriptor enables the `fields` parameter.
	pub fn fetch_user<'a, P>(
		&'a self,
		access_token: &'a str,
		fields: &'a [&'a str],
		cancel: Option<&'a CancellationToken>,
	) -> ProviderFuture<'a, P>
	where
		P: 'a + Send + DeserializeOwned,
	{
		self.observe(Operation::FetchUser, async move {
			self.ensure_supported(Capability::FetchUser)?;
			require_non_empty("access token", access_token)?;

			let mut url = self
				.descriptor
				.endpoints
				.user_info
				.clone()
				.ok_or_else(|| Error::not_supported(&self.descriptor.id, Capability::FetchUser))?;

			if self.descriptor.quirks.user_fields_param && !fields.is_empty() {
				url.query_pairs_mut().append_pair("fields", &fields.join(","));
			}

			let request = get(&url, Some(access_token))?;

			self.execute_json(Operation::FetchUser, request, cancel).await
		})
	}

	/// Sends one request and returns the raw response.
	///
	/// Transport failures are mapped through the configured [`TransportErrorMapper`]; HTTP
	/// statuses are left untouched.
	pub async fn execute(
		&self,
		operation: Operation,
		request: HttpRequest,
		cancel: Option<&CancellationToken>,
	) -> Result<HttpResponse> {
		if cancel.is_some_and(CancellationToken::is_cancelled) {
			return Err(Error::Cancelled { operation });
		}

		let handle = self.http_client.handle();
		let call = handle.call(request);
		let outcome = match cancel {
			Some(token) =>
				token.run_until_cancelled(call).await.ok_or(Error::Cancelled { operation })?,
			None => call.await,
		};

		outcome.map_err(|e| self.transport_mapper.map_transport_error(operation, e))
	}

	async fn execute_json<T>(
		&self,
		operation: Operation,
		request: HttpRequest,
		cancel: Option<&CancellationToken>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(operation, request, cancel).await?;

		decode_response(operation, response)
	}

	fn client_parameters(&self) -> [(&'static str, String); 2] {
		[
			("client_id", self.credential.client_id.clone()),
			("client_secret", self.credential.client_secret.expose().to_owned()),
		]
	}

	fn observe<'a, T, F>(&'a self, operation: Operation, fut: F) -> ProviderFuture<'a, T>
	where
		T: 'a,
		F: 'a + Send + Future<Output = Result<T>>,
	{
		let provider = self.descriptor.id.as_str();
		let span = OperationSpan::new(provider, operation);

		Box::pin(async move {
			obs::record_operation_outcome(provider, operation, OperationOutcome::Attempt);

			let result = span.instrument(fut).await;

			obs::record_operation_result(provider, operation, &result);

			result
		})
	}
}
impl<C, M> Clone for ProviderClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			descriptor: self.descriptor.clone(),
			credential: self.credential.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
		}
	}
}
impl<C, M> Debug for ProviderClient<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient")
			.field("descriptor", &self.descriptor)
			.field("credential", &self.credential)
			.finish_non_exhaustive()
	}
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
	if value.is_empty() {
		Err(Error::invalid_request(format_args!("{name} is empty")))
	} else {
		Ok(())
	}
}

fn form_post(url: &Url, params: &[(&'static str, String)]) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(params.iter()).finish();

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(ACCEPT, JSON_ACCEPT)
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.body(body.into_bytes())
		.map_err(|e| Error::invalid_request(format_args!("request could not be built ({e})")))
}

fn get(url: &Url, bearer: Option<&str>) -> Result<HttpRequest> {
	let mut builder =
		Request::builder().method(Method::GET).uri(url.as_str()).header(ACCEPT, JSON_ACCEPT);

	if let Some(token) = bearer {
		builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
	}

	builder
		.body(Vec::new())
		.map_err(|e| Error::invalid_request(format_args!("request could not be built ({e})")))
}

fn ensure_success(operation: Operation, response: HttpResponse) -> Result<HttpResponse> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	Err(Error::Server {
		operation,
		status: status.as_u16(),
		body: String::from_utf8_lossy(response.body()).into_owned(),
		retry_after: parse_retry_after(response.headers()),
	})
}

fn decode_response<T>(operation: Operation, response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let response = ensure_success(operation, response)?;
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode {
		operation,
		status: response.status().as_u16(),
		body: String::from_utf8_lossy(response.body()).into_owned(),
		source,
	})
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<i64>() {
		return Some(Duration::seconds(secs.max(0)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
