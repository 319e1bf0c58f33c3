//! Credential lookup contract and built-in credential stores.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

// self
use crate::{
	_prelude::*,
	auth::{ClientCredential, ProviderId},
};

/// Source of client credentials, consulted once when an adapter is constructed.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the credential registered for `provider`.
	///
	/// Missing entries must surface as [`CredentialError::NotFound`].
	fn resolve(&self, provider: &ProviderId) -> Result<ClientCredential, CredentialError>;
}
impl<T> CredentialStore for Arc<T>
where
	T: ?Sized + CredentialStore,
{
	fn resolve(&self, provider: &ProviderId) -> Result<ClientCredential, CredentialError> {
		(**self).resolve(provider)
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialError {
	/// No credential is registered for the provider.
	#[error("No client credential is configured for provider `{provider}`.")]
	NotFound {
		/// Provider identifier string.
		provider: String,
	},
	/// The backing data could not be parsed or serialized.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl CredentialError {
	/// Builds [`CredentialError::NotFound`] for `provider`.
	pub fn not_found(provider: &ProviderId) -> Self {
		Self::NotFound { provider: provider.to_string() }
	}
}
