//! Client identity registered with a provider.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Client id and secret issued by a provider's developer console.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredential {
	/// Public client identifier.
	pub client_id: String,
	/// Confidential client secret.
	pub client_secret: TokenSecret,
}
impl ClientCredential {
	/// Builds a credential from its two halves.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<TokenSecret>) -> Self {
		Self { client_id: client_id.into(), client_secret: client_secret.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_hides_the_secret() {
		let credential = ClientCredential::new("abc", "shh");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains("abc"));
		assert!(!rendered.contains("shh"));
	}

	#[test]
	fn deserializes_from_config_json() {
		let credential: ClientCredential =
			serde_json::from_str(r#"{"client_id":"abc","client_secret":"shh"}"#)
				.expect("Credential JSON should deserialize.");

		assert_eq!(credential, ClientCredential::new("abc", "shh"));
	}
}
