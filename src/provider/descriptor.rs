//! Provider descriptor data structures shared by every adapter.
//!
//! The module exposes validated metadata, supporting builder utilities, and capability flags so
//! providers can describe themselves in a transport-agnostic way.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Capability flags wired into provider descriptors.
pub mod capability;
/// Provider-specific wire toggles.
pub mod quirks;

pub use builder::*;
pub use capability::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the user agent is redirected to.
	pub authorization: Url,
	/// Token endpoint used for code exchanges and refreshes.
	pub token: Url,
	/// Optional revocation endpoint.
	pub revocation: Option<Url>,
	/// Optional user profile endpoint.
	pub user_info: Option<Url>,
}

/// Immutable provider descriptor consumed by adapters.
///
/// Deserialization runs the same validation as [`ProviderDescriptorBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedDescriptor")]
pub struct ProviderDescriptor {
	/// Descriptor identifier; also keys the client credential.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Operations the provider offers.
	pub capabilities: Capabilities,
	/// Provider-specific wire quirks.
	pub quirks: ProviderQuirks,
}
impl TryFrom<UncheckedDescriptor> for ProviderDescriptor {
	type Error = ProviderDescriptorError;

	fn try_from(value: UncheckedDescriptor) -> Result<Self, Self::Error> {
		let UncheckedDescriptor { id, endpoints, capabilities, quirks } = value;
		let descriptor = Self { id, endpoints, capabilities, quirks };

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Checks whether the descriptor offers a given capability.
	pub fn supports(&self, capability: Capability) -> bool {
		self.capabilities.supports(capability)
	}

	/// Returns a copy whose endpoints keep their paths but use the scheme, host, and port of
	/// `origin`.
	///
	/// Useful for pointing an adapter at a proxy or a local mock server; the result is validated
	/// again, so plain HTTP is only accepted for loopback origins.
	pub fn with_origin(&self, origin: &Url) -> Result<Self, ProviderDescriptorError> {
		let mut rebased = self.clone();
		let endpoints = &mut rebased.endpoints;

		rebase(&mut endpoints.authorization, origin)?;
		rebase(&mut endpoints.token, origin)?;

		if let Some(url) = endpoints.revocation.as_mut() {
			rebase(url, origin)?;
		}
		if let Some(url) = endpoints.user_info.as_mut() {
			rebase(url, origin)?;
		}

		rebased.validate()?;

		Ok(rebased)
	}
}

#[derive(Deserialize)]
struct UncheckedDescriptor {
	id: ProviderId,
	endpoints: ProviderEndpoints,
	capabilities: Capabilities,
	quirks: ProviderQuirks,
}

fn rebase(url: &mut Url, origin: &Url) -> Result<(), ProviderDescriptorError> {
	let invalid = || ProviderDescriptorError::InvalidOrigin { url: origin.to_string() };

	url.set_scheme(origin.scheme()).map_err(|_| invalid())?;
	url.set_host(origin.host_str()).map_err(|_| invalid())?;
	url.set_port(origin.port()).map_err(|_| invalid())?;

	Ok(())
}
