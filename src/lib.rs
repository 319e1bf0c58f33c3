//! One OAuth 2.0 authorization-code contract for Google, Facebook, and Mercado Livre: typed
//! authorization URLs, code exchanges, refreshes, revocations, and user lookups that all fail
//! through the same error taxonomy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod request;
pub mod store;
pub mod token;
#[cfg(all(any(test, feature = "test", debug_assertions), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)`, the
	//! `test` crate feature, or any debug build.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ClientCredential, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
		provider::ProviderDescriptor,
	};

	/// Client id used by the integration suites.
	pub const TEST_CLIENT_ID: &str = "abc";
	/// Client secret used by the integration suites.
	pub const TEST_CLIENT_SECRET: &str = "shh-secret";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns the credential registered under [`TEST_CLIENT_ID`].
	pub fn test_credential() -> ClientCredential {
		ClientCredential::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
	}

	/// Shorthand for the reqwest error mapper shared by integration tests.
	pub fn test_transport_mapper() -> ReqwestTransportErrorMapper {
		ReqwestTransportErrorMapper
	}

	/// Points every endpoint of `descriptor` at the mock server reachable under `base_url`.
	pub fn rebase_descriptor(descriptor: ProviderDescriptor, base_url: &str) -> ProviderDescriptor {
		let origin = Url::parse(base_url).expect("Mock server base URL should parse.");

		descriptor.with_origin(&origin).expect("Rebased descriptor should stay valid.")
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
