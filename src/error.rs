//! Error taxonomy shared by adapters, transports, and credential stores.
//!
//! Every adapter operation resolves to exactly one [`Error`] variant. Server and decode failures
//! keep the raw HTTP status and body so callers can inspect provider-specific payloads, while
//! [`Error::oauth_error`] offers a parsed view of RFC 6749 error responses.

// self
use crate::{_prelude::*, obs::Operation, provider::Capability, store::CredentialError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller input was rejected before any network call.
	#[error("Invalid request: {reason}.")]
	InvalidRequest {
		/// Human-readable reason.
		reason: String,
	},
	/// The credential store holds no entry for the provider.
	#[error("No client credential is configured for provider `{provider}`.")]
	CredentialNotFound {
		/// Provider identifier string.
		provider: String,
	},
	/// The credential store failed for a reason other than a missing entry.
	#[error(transparent)]
	Credential(CredentialError),
	/// Local configuration problem (descriptors, identifiers).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure; no HTTP response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a non-success status.
	#[error("The {operation} request failed with HTTP status {status}.")]
	Server {
		/// Operation that reached the provider.
		operation: Operation,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
		/// `Retry-After` hint, when the provider supplied one.
		retry_after: Option<Duration>,
	},
	/// Provider answered with a success status but the body did not match the expected shape.
	#[error("The {operation} response could not be decoded.")]
	Decode {
		/// Operation that reached the provider.
		operation: Operation,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
		/// Structured decoding failure naming the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The adapter does not offer the requested capability.
	#[error("Provider `{provider}` does not support {capability}.")]
	NotSupported {
		/// Provider identifier string.
		provider: String,
		/// Capability that was requested.
		capability: Capability,
	},
	/// The caller cancelled the operation.
	#[error("The {operation} request was cancelled.")]
	Cancelled {
		/// Operation that was abandoned.
		operation: Operation,
	},
}
impl Error {
	/// Builds an [`Error::InvalidRequest`] from any displayable reason.
	pub fn invalid_request(reason: impl Display) -> Self {
		Self::InvalidRequest { reason: reason.to_string() }
	}

	/// Builds an [`Error::NotSupported`] for `provider`.
	pub fn not_supported(provider: impl Display, capability: Capability) -> Self {
		Self::NotSupported { provider: provider.to_string(), capability }
	}

	/// Returns the operation label attached to server, decode, and cancellation failures.
	pub fn operation(&self) -> Option<Operation> {
		match self {
			Self::Server { operation, .. }
			| Self::Decode { operation, .. }
			| Self::Cancelled { operation } => Some(*operation),
			_ => None,
		}
	}

	/// Returns the HTTP status, when the provider answered.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Server { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns the raw response body, when the provider answered.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::Server { body, .. } | Self::Decode { body, .. } => Some(body),
			_ => None,
		}
	}

	/// Parses an RFC 6749 `{ "error": ..., "error_description": ... }` body out of a server
	/// failure.
	///
	/// Returns `None` for other variants or when the body uses a different shape (Facebook, for
	/// example, nests its error object).
	pub fn oauth_error(&self) -> Option<OAuthErrorBody> {
		let Self::Server { body, .. } = self else {
			return None;
		};

		serde_json::from_str(body).ok()
	}
}
impl From<CredentialError> for Error {
	fn from(e: CredentialError) -> Self {
		match e {
			CredentialError::NotFound { provider } => Self::CredentialNotFound { provider },
			e => Self::Credential(e),
		}
	}
}

/// RFC 6749 section 5.2 error payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OAuthErrorBody {
	/// Error code such as `invalid_grant`.
	pub error: String,
	/// Optional human-readable description.
	#[serde(default)]
	pub error_description: Option<String>,
	/// Optional URI pointing at documentation for the error.
	#[serde(default)]
	pub error_uri: Option<String>,
}

/// Configuration and validation failures raised while assembling adapters.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Endpoint constant or override is not a valid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Provider identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidEndpoint { source }
	}
}
impl From<url::ParseError> for Error {
	fn from(e: url::ParseError) -> Self {
		ConfigError::from(e).into()
	}
}
impl From<crate::provider::ProviderDescriptorError> for Error {
	fn from(e: crate::provider::ProviderDescriptorError) -> Self {
		ConfigError::from(e).into()
	}
}
impl From<crate::auth::IdentifierError> for Error {
	fn from(e: crate::auth::IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failure described only by a message.
	#[error("Transport failure: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn server_error(body: &str) -> Error {
		Error::Server {
			operation: Operation::ExchangeCode,
			status: 400,
			body: body.into(),
			retry_after: None,
		}
	}

	#[test]
	fn oauth_error_parses_rfc6749_bodies() {
		let err = server_error(r#"{"error":"invalid_grant","error_description":"Bad code."}"#);
		let parsed = err.oauth_error().expect("RFC 6749 body should parse.");

		assert_eq!(parsed.error, "invalid_grant");
		assert_eq!(parsed.error_description.as_deref(), Some("Bad code."));
		assert_eq!(err.status(), Some(400));
		assert_eq!(err.operation(), Some(Operation::ExchangeCode));
	}

	#[test]
	fn oauth_error_ignores_foreign_shapes() {
		let err = server_error(r#"{"error":{"message":"Invalid verification code","code":100}}"#);

		assert!(err.oauth_error().is_none());
		assert!(Error::Cancelled { operation: Operation::FetchUser }.oauth_error().is_none());
	}

	#[test]
	fn credential_not_found_is_promoted() {
		let err = Error::from(CredentialError::NotFound { provider: "google".into() });

		assert!(matches!(err, Error::CredentialNotFound { ref provider } if provider == "google"));

		let err = Error::from(CredentialError::Backend { message: "disk gone".into() });

		assert!(matches!(err, Error::Credential(CredentialError::Backend { .. })));
	}

	#[test]
	fn server_display_names_the_operation() {
		assert_eq!(
			server_error("{}").to_string(),
			"The token exchange request failed with HTTP status 400."
		);
		assert_eq!(
			Error::not_supported("facebook", Capability::RefreshToken).to_string(),
			"Provider `facebook` does not support token refresh."
		);
	}
}
