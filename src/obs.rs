//! Optional observability helpers for adapter operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_social.operation` with the
//!   `provider` and `operation` fields, plus a `warn!` event for every failed call.
//! - Enable `metrics` to increment the `oauth2_social_operation_total` counter for every
//!   attempt/success/failure, labeled by `provider` + `operation` + `outcome`.
//!
//! Neither layer ever records response bodies, tokens, or client secrets.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Calls an adapter can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
	/// Authorization URL construction.
	Authorize,
	/// Authorization-code exchange.
	ExchangeCode,
	/// Refresh-token grant.
	RefreshToken,
	/// Token revocation.
	RevokeToken,
	/// Authenticated user profile lookup.
	FetchUser,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Authorize => "authorize",
			Operation::ExchangeCode => "exchange_code",
			Operation::RefreshToken => "refresh_token",
			Operation::RevokeToken => "revoke_token",
			Operation::FetchUser => "fetch_user",
		}
	}

	/// Returns the phrase used in error messages.
	pub const fn describe(self) -> &'static str {
		match self {
			Operation::Authorize => "authorization URL",
			Operation::ExchangeCode => "token exchange",
			Operation::RefreshToken => "token refresh",
			Operation::RevokeToken => "token revocation",
			Operation::FetchUser => "user fetch",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.describe())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an adapter operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of an operation: the metrics counter plus, for failures, a log
/// event.
pub fn record_operation_result<T>(provider: &str, operation: Operation, result: &Result<T>) {
	match result {
		Ok(_) => record_operation_outcome(provider, operation, OperationOutcome::Success),
		Err(e) => {
			log_operation_failure(provider, operation, e);
			record_operation_outcome(provider, operation, OperationOutcome::Failure);
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(Operation::ExchangeCode.as_str(), "exchange_code");
		assert_eq!(Operation::RevokeToken.to_string(), "token revocation");
		assert_eq!(OperationOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn record_operation_result_accepts_both_outcomes() {
		record_operation_result("google", Operation::FetchUser, &Ok::<_, Error>(()));
		record_operation_result::<()>(
			"google",
			Operation::FetchUser,
			&Err(Error::Cancelled { operation: Operation::FetchUser }),
		);
	}
}
