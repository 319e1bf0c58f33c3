// self
use crate::_prelude::*;

/// How the token endpoint expects code exchanges to arrive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRequestStyle {
	/// `POST` with an `application/x-www-form-urlencoded` body.
	#[default]
	FormPost,
	/// `GET` with every parameter in the query string.
	QueryGet,
}

/// Provider-specific quirks that shape outgoing requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Transport shape of the code exchange. Refreshes and revocations always use a form POST.
	pub token_request_style: TokenRequestStyle,
	/// Whether code exchanges carry `grant_type=authorization_code`.
	pub send_grant_type: bool,
	/// Whether user lookups forward the requested fields as a comma-joined `fields` parameter.
	pub user_fields_param: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			token_request_style: TokenRequestStyle::FormPost,
			send_grant_type: true,
			user_fields_param: false,
		}
	}
}
