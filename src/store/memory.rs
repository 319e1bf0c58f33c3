//! Thread-safe in-memory [`CredentialStore`] for programmatic registration and tests.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredential, ProviderId},
	store::{CredentialError, CredentialStore},
};

type CredentialMap = Arc<RwLock<HashMap<ProviderId, ClientCredential>>>;

/// Credentials kept in-process; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore(CredentialMap);
impl MemoryCredentialStore {
	/// Registers `credential` and returns the store, for builder-style setup.
	pub fn with_credential(self, provider: ProviderId, credential: ClientCredential) -> Self {
		self.insert(provider, credential);

		self
	}

	/// Registers or replaces the credential for `provider`, returning the previous entry.
	pub fn insert(
		&self,
		provider: ProviderId,
		credential: ClientCredential,
	) -> Option<ClientCredential> {
		self.0.write().insert(provider, credential)
	}

	/// Removes the credential for `provider`.
	pub fn remove(&self, provider: &ProviderId) -> Option<ClientCredential> {
		self.0.write().remove(provider)
	}
}
impl CredentialStore for MemoryCredentialStore {
	fn resolve(&self, provider: &ProviderId) -> Result<ClientCredential, CredentialError> {
		self.0.read().get(provider).cloned().ok_or_else(|| CredentialError::not_found(provider))
	}
}
