//! JSON-file [`CredentialStore`] for deployments that keep client secrets on disk.
//!
//! The file holds one object keyed by provider id:
//!
//! ```json
//! { "google": { "client_id": "...", "client_secret": "..." } }
//! ```

// std
use std::{
	collections::BTreeMap,
	fs::{self, File},
	io::Write,
};
// self
use crate::{
	_prelude::*,
	auth::{ClientCredential, ProviderId},
	store::{CredentialError, CredentialStore},
};

/// Credentials loaded from, and persisted to, a JSON file.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<ProviderId, ClientCredential>>>,
}
impl FileCredentialStore {
	/// Opens the store at `path`, eagerly loading existing entries.
	///
	/// A missing or empty file yields an empty store; the file is created on the first
	/// [`insert`](Self::insert).
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
		let path = path.into();
		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Returns the backing file path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Re-reads the file, replacing every in-memory entry.
	pub fn reload(&self) -> Result<(), CredentialError> {
		let snapshot = Self::load_snapshot(&self.path)?;

		*self.inner.write() = snapshot;

		Ok(())
	}

	/// Registers or replaces the credential for `provider` and rewrites the file.
	pub fn insert(
		&self,
		provider: ProviderId,
		credential: ClientCredential,
	) -> Result<(), CredentialError> {
		let mut guard = self.inner.write();

		guard.insert(provider, credential);

		self.persist_locked(&guard)
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<ProviderId, ClientCredential>, CredentialError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| CredentialError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(HashMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| CredentialError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), CredentialError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| CredentialError::Backend {
				message: format!("Failed to create credential directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(
		&self,
		contents: &HashMap<ProviderId, ClientCredential>,
	) -> Result<(), CredentialError> {
		Self::ensure_parent_exists(&self.path)?;

		let sorted: BTreeMap<_, _> = contents.iter().collect();
		let serialized =
			serde_json::to_vec_pretty(&sorted).map_err(|e| CredentialError::Serialization {
				message: format!("Failed to serialize credentials: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CredentialError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| CredentialError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CredentialError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| CredentialError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileCredentialStore {
	fn resolve(&self, provider: &ProviderId) -> Result<ClientCredential, CredentialError> {
		self.inner.read().get(provider).cloned().ok_or_else(|| CredentialError::not_found(provider))
	}
}
