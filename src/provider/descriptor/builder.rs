// std
use std::net::IpAddr;
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{
		Capabilities, Capability, ProviderDescriptor, ProviderEndpoints, ProviderQuirks,
		TokenRequestStyle,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required to build authorization URLs.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory for code exchanges.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Every provider must offer the code exchange.
	#[error("Descriptor must enable the exchange_code capability.")]
	ExchangeCodeRequired,
	/// Revocation is enabled without an endpoint to call.
	#[error("The revoke_token capability requires a revocation endpoint.")]
	MissingRevocationEndpoint,
	/// User lookups are enabled without an endpoint to call.
	#[error("The fetch_user capability requires a user info endpoint.")]
	MissingUserInfoEndpoint,
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The origin handed to [`ProviderDescriptor::with_origin`] cannot host endpoints.
	#[error("The origin {url} cannot be applied to provider endpoints.")]
	InvalidOrigin {
		/// Origin that was rejected.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for exchanges and refreshes.
	pub token_endpoint: Option<Url>,
	/// Optional revocation endpoint.
	pub revocation_endpoint: Option<Url>,
	/// Optional user profile endpoint.
	pub user_info_endpoint: Option<Url>,
	/// Capabilities enabled for the provider.
	pub capabilities: Capabilities,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorization_endpoint: None,
			token_endpoint: None,
			revocation_endpoint: None,
			user_info_endpoint: None,
			capabilities: Capabilities::default(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the optional revocation endpoint.
	pub fn revocation_endpoint(mut self, url: Url) -> Self {
		self.revocation_endpoint = Some(url);

		self
	}

	/// Sets the optional user profile endpoint.
	pub fn user_info_endpoint(mut self, url: Url) -> Self {
		self.user_info_endpoint = Some(url);

		self
	}

	/// Marks a single capability as supported.
	pub fn support(mut self, capability: Capability) -> Self {
		self.capabilities = self.capabilities.enable(capability);

		self
	}

	/// Marks multiple capabilities as supported.
	pub fn support_all<I>(mut self, capabilities: I) -> Self
	where
		I: IntoIterator<Item = Capability>,
	{
		for capability in capabilities {
			self.capabilities = self.capabilities.enable(capability);
		}

		self
	}

	/// Overrides how code exchanges reach the token endpoint.
	pub fn token_request_style(mut self, style: TokenRequestStyle) -> Self {
		self.quirks.token_request_style = style;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let endpoints = ProviderEndpoints {
			authorization,
			token,
			revocation: self.revocation_endpoint,
			user_info: self.user_info_endpoint,
		};
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints,
			capabilities: self.capabilities,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub(crate) fn validate(&self) -> Result<(), ProviderDescriptorError> {
		if !self.supports(Capability::ExchangeCode) {
			return Err(ProviderDescriptorError::ExchangeCodeRequired);
		}
		if self.supports(Capability::RevokeToken) && self.endpoints.revocation.is_none() {
			return Err(ProviderDescriptorError::MissingRevocationEndpoint);
		}
		if self.supports(Capability::FetchUser) && self.endpoints.user_info.is_none() {
			return Err(ProviderDescriptorError::MissingUserInfoEndpoint);
		}

		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;

		if let Some(revocation) = self.endpoints.revocation.as_ref() {
			validate_endpoint("revocation", revocation)?;
		}
		if let Some(user_info) = self.endpoints.user_info.as_ref() {
			validate_endpoint("user info", user_info)?;
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder(ProviderId::new("demo").expect("Provider id should be valid."))
			.authorization_endpoint(url("https://demo.example/authorize"))
			.token_endpoint(url("https://demo.example/token"))
			.support(Capability::ExchangeCode)
	}

	#[test]
	fn exchange_code_is_mandatory() {
		let err = ProviderDescriptor::builder(
			ProviderId::new("demo").expect("Provider id should be valid."),
		)
		.authorization_endpoint(url("https://demo.example/authorize"))
		.token_endpoint(url("https://demo.example/token"))
		.support(Capability::RefreshToken)
		.build()
		.unwrap_err();

		assert_eq!(err, ProviderDescriptorError::ExchangeCodeRequired);
	}

	#[test]
	fn optional_capabilities_need_endpoints() {
		assert_eq!(
			builder().support(Capability::RevokeToken).build().unwrap_err(),
			ProviderDescriptorError::MissingRevocationEndpoint
		);
		assert_eq!(
			builder().support(Capability::FetchUser).build().unwrap_err(),
			ProviderDescriptorError::MissingUserInfoEndpoint
		);
	}

	#[test]
	fn plain_http_is_limited_to_loopback() {
		assert!(matches!(
			builder().token_endpoint(url("http://demo.example/token")).build(),
			Err(ProviderDescriptorError::InsecureEndpoint { endpoint: "token", .. })
		));

		for loopback in ["http://127.0.0.1:8080/token", "http://localhost/token", "http://[::1]/token"]
		{
			builder()
				.token_endpoint(url(loopback))
				.build()
				.expect("Loopback HTTP endpoints should be accepted.");
		}
	}

	#[test]
	fn with_origin_keeps_paths() {
		let descriptor = builder()
			.user_info_endpoint(url("https://api.demo.example/v1/me?alt=json"))
			.support(Capability::FetchUser)
			.build()
			.expect("Fixture descriptor should build.");
		let rebased = descriptor
			.with_origin(&url("http://127.0.0.1:4010"))
			.expect("Loopback origin should be accepted.");

		assert_eq!(rebased.endpoints.token.as_str(), "http://127.0.0.1:4010/token");
		assert_eq!(
			rebased.endpoints.user_info.as_ref().map(Url::as_str),
			Some("http://127.0.0.1:4010/v1/me?alt=json")
		);
		assert!(matches!(
			descriptor.with_origin(&url("http://proxy.example")),
			Err(ProviderDescriptorError::InsecureEndpoint { .. })
		));
	}
}
