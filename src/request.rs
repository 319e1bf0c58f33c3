//! Authorization request model and the parameter serializer shared by every provider.
//!
//! Each provider ships a typed request struct implementing [`AuthorizationRequest`]. Its
//! [`build_parameters`](AuthorizationRequest::build_parameters) output always starts with
//! `client_id`, `redirect_uri`, `response_type`, and `scope` (emitted even when no scopes were
//! requested), followed by provider-specific optional fields that are only present when set.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

/// Default `response_type` for the authorization-code flow.
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

const STATE_LEN: usize = 32;

/// Typed authorization request for a single provider.
pub trait AuthorizationRequest
where
	Self: Send + Sync,
{
	/// Character joining scopes inside the `scope` parameter.
	const SCOPE_DELIMITER: char;

	/// Redirect URI the provider sends the user back to.
	fn redirect_uri(&self) -> &str;

	/// Serializes the request into ordered query parameters.
	///
	/// Must be pure: identical inputs produce identical, identically ordered output.
	fn build_parameters(&self, client_id: &str) -> AuthorizationParameters;
}

/// Ordered `(key, value)` list destined for an authorization URL's query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationParameters(Vec<(&'static str, String)>);
impl AuthorizationParameters {
	/// Seeds the list with the parameters every provider receives, in their fixed order.
	pub fn base(client_id: &str, redirect_uri: &str, response_type: &str, scope: String) -> Self {
		Self(vec![
			("client_id", client_id.to_owned()),
			("redirect_uri", redirect_uri.to_owned()),
			("response_type", response_type.to_owned()),
			("scope", scope),
		])
	}

	/// Appends a parameter unconditionally.
	pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
		self.0.push((key, value.into()));
	}

	/// Appends a parameter only when `value` is present and non-empty.
	pub fn push_present(&mut self, key: &'static str, value: Option<&str>) {
		if let Some(value) = value.filter(|value| !value.is_empty()) {
			self.push(key, value);
		}
	}

	/// Returns the first value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
	}

	/// Iterates over the parameters in emission order.
	pub fn iter(&self) -> impl Iterator<Item = &(&'static str, String)> {
		self.0.iter()
	}

	/// Returns the parameter keys in emission order.
	pub fn keys(&self) -> Vec<&'static str> {
		self.0.iter().map(|(k, _)| *k).collect()
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no parameters were added.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Consumes the list, returning the raw pairs.
	pub fn into_inner(self) -> Vec<(&'static str, String)> {
		self.0
	}
}

/// Joins scopes with `delimiter`, preserving their order.
///
/// An empty list yields an empty string.
pub fn join_scopes<S>(scopes: &[S], delimiter: char) -> String
where
	S: AsRef<str>,
{
	let mut joined = String::new();

	for (i, scope) in scopes.iter().enumerate() {
		if i > 0 {
			joined.push(delimiter);
		}

		joined.push_str(scope.as_ref());
	}

	joined
}

/// Opaque anti-CSRF value sent as `state` and compared when the provider redirects back.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationState(String);
impl AuthorizationState {
	/// Generates a random 32-character alphanumeric state.
	pub fn generate() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect())
	}

	/// Returns the state value.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl From<AuthorizationState> for String {
	fn from(value: AuthorizationState) -> Self {
		value.0
	}
}
impl Debug for AuthorizationState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthorizationState(..)")
	}
}

pub(crate) fn validate_redirect_uri(redirect_uri: &str) -> Result<Url> {
	if redirect_uri.is_empty() {
		return Err(Error::invalid_request("redirect_uri is empty"));
	}

	let url = Url::parse(redirect_uri)
		.map_err(|e| Error::invalid_request(format!("redirect_uri is not an absolute URL ({e})")))?;

	if url.cannot_be_a_base() {
		return Err(Error::invalid_request("redirect_uri is not a hierarchical URL"));
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn join_scopes_uses_the_delimiter() {
		assert_eq!(join_scopes(&["email", "profile"], ' '), "email profile");
		assert_eq!(join_scopes(&["email", "public_profile"], ','), "email,public_profile");
		assert_eq!(join_scopes::<&str>(&[], ' '), "");
	}

	#[test]
	fn base_parameters_come_first() {
		let mut params = AuthorizationParameters::base("abc", "https://app/cb", "code", "".into());

		params.push_present("state", Some(""));
		params.push_present("state", None);
		params.push_present("state", Some("s1"));

		assert_eq!(params.keys(), ["client_id", "redirect_uri", "response_type", "scope", "state"]);
		assert_eq!(params.get("scope"), Some(""));
		assert_eq!(params.get("state"), Some("s1"));
	}

	#[test]
	fn generated_states_are_alphanumeric_and_distinct() {
		let a = AuthorizationState::generate();
		let b = AuthorizationState::generate();

		assert_eq!(a.as_str().len(), STATE_LEN);
		assert!(a.as_str().chars().all(|ch| ch.is_ascii_alphanumeric()));
		assert_ne!(a, b);
	}

	#[test]
	fn redirect_uri_must_be_absolute() {
		assert!(matches!(validate_redirect_uri(""), Err(Error::InvalidRequest { .. })));
		assert!(matches!(validate_redirect_uri("/cb"), Err(Error::InvalidRequest { .. })));
		assert!(matches!(validate_redirect_uri("mailto:a@b.c"), Err(Error::InvalidRequest { .. })));

		validate_redirect_uri("https://app/cb").expect("Absolute redirect URI should validate.");
	}
}
