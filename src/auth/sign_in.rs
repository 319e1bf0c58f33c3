//! Authorization response echoed back to the redirect URI.

// self
use crate::_prelude::*;

/// Authorization code and state a provider appended to the redirect URI.
///
/// The code is kept exactly as received (possibly percent-encoded); adapters call
/// [`SignInCode::decoded_code`] once before sending it to the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCode {
	/// Authorization code, possibly still percent-encoded.
	pub code: String,
	/// Anti-CSRF state echoed by the provider.
	#[serde(default)]
	pub state: String,
	/// Redirect URI the code was issued for; token endpoints require the same value.
	#[serde(default)]
	pub redirect_uri: Option<String>,
}
impl SignInCode {
	/// Creates a sign-in code without a redirect URI.
	///
	/// Exchanges then omit `redirect_uri`. Google and Mercado Livre reject a code issued for a
	/// redirect URI unless the same value is sent back, so attach it with
	/// [`SignInCode::with_redirect_uri`] for those providers.
	pub fn new(code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { code: code.into(), state: state.into(), redirect_uri: None }
	}

	/// Attaches the redirect URI the authorization request used.
	pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(redirect_uri.into());

		self
	}

	/// Percent-decodes the code exactly once.
	///
	/// Codes without `%` sequences come back unchanged and `+` is kept literal. This differs from
	/// form-style (`application/x-www-form-urlencoded`) decoding, which would turn `+` into a
	/// space, so pass the raw query value rather than one already form-decoded. Fails with
	/// [`Error::InvalidRequest`] when the code is empty or the decoded bytes are not UTF-8.
	pub fn decoded_code(&self) -> Result<Cow<'_, str>> {
		if self.code.is_empty() {
			return Err(Error::invalid_request("authorization code is empty"));
		}

		urlencoding::decode(&self.code)
			.map_err(|_| Error::invalid_request("authorization code is not valid UTF-8 once decoded"))
	}

	/// Checks the echoed state against the value issued with the authorization request.
	pub fn verify_state(&self, expected: &str) -> Result<()> {
		if self.state != expected {
			return Err(Error::invalid_request("authorization state does not match"));
		}

		Ok(())
	}
}
impl Debug for SignInCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignInCode")
			.field("code", &"<redacted>")
			.field("state", &self.state)
			.field("redirect_uri", &self.redirect_uri)
			.finish()
	}
}
