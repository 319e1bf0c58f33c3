//! Access token response contract implemented by each provider's token type.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Typed token endpoint response.
///
/// Responses are handed to the caller as-is; nothing here caches or persists them.
pub trait AccessTokenResponse
where
	Self: 'static + Send + Sync + DeserializeOwned,
{
	/// Bearer credential for API calls.
	fn access_token(&self) -> &TokenSecret;

	/// Token type reported by the provider (usually `Bearer`).
	fn token_type(&self) -> &str;

	/// Lifetime of the access token in seconds, relative to issuance.
	fn expires_in(&self) -> u64;

	/// Refresh credential, for providers that issue one.
	fn refresh_token(&self) -> Option<&TokenSecret> {
		None
	}

	/// Granted scopes as the provider reported them.
	fn scope(&self) -> Option<&str> {
		None
	}

	/// Absolute expiry given the instant the response was received.
	///
	/// Returns `None` if the lifetime cannot be represented.
	fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		let seconds = i64::try_from(self.expires_in()).ok()?;

		issued_at.checked_add(Duration::seconds(seconds))
	}
}
