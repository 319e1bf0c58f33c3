// self
use crate::_prelude::*;

/// Operations an adapter may offer beyond building authorization URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
	/// Authorization-code exchange; every provider offers it.
	ExchangeCode,
	/// Refresh-token grant.
	RefreshToken,
	/// Token revocation.
	RevokeToken,
	/// Authenticated user profile lookup.
	FetchUser,
}
impl Capability {
	/// Every capability, in declaration order.
	pub const ALL: [Capability; 4] = [
		Capability::ExchangeCode,
		Capability::RefreshToken,
		Capability::RevokeToken,
		Capability::FetchUser,
	];

	/// Returns a stable snake_case label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Capability::ExchangeCode => "exchange_code",
			Capability::RefreshToken => "refresh_token",
			Capability::RevokeToken => "revoke_token",
			Capability::FetchUser => "fetch_user",
		}
	}
}
impl Display for Capability {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			Capability::ExchangeCode => "token exchange",
			Capability::RefreshToken => "token refresh",
			Capability::RevokeToken => "token revocation",
			Capability::FetchUser => "user fetch",
		})
	}
}

/// Collection of capability flags wired into the descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
	/// Authorization-code exchange.
	pub exchange_code: bool,
	/// Refresh-token grant.
	pub refresh_token: bool,
	/// Token revocation.
	pub revoke_token: bool,
	/// User profile lookup.
	pub fetch_user: bool,
}
impl Capabilities {
	/// Returns true if the provided capability is enabled.
	pub fn supports(self, capability: Capability) -> bool {
		match capability {
			Capability::ExchangeCode => self.exchange_code,
			Capability::RefreshToken => self.refresh_token,
			Capability::RevokeToken => self.revoke_token,
			Capability::FetchUser => self.fetch_user,
		}
	}

	/// Marks a capability as enabled.
	pub fn enable(mut self, capability: Capability) -> Self {
		match capability {
			Capability::ExchangeCode => self.exchange_code = true,
			Capability::RefreshToken => self.refresh_token = true,
			Capability::RevokeToken => self.revoke_token = true,
			Capability::FetchUser => self.fetch_user = true,
		}

		self
	}

	/// Iterates over the enabled capabilities.
	pub fn iter(self) -> impl Iterator<Item = Capability> {
		Capability::ALL.into_iter().filter(move |capability| self.supports(*capability))
	}
}
impl FromIterator<Capability> for Capabilities {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = Capability>,
	{
		iter.into_iter().fold(Self::default(), Self::enable)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn flags_follow_enable() {
		let capabilities: Capabilities =
			[Capability::ExchangeCode, Capability::FetchUser].into_iter().collect();

		assert!(capabilities.supports(Capability::ExchangeCode));
		assert!(!capabilities.supports(Capability::RefreshToken));
		assert_eq!(
			capabilities.iter().collect::<Vec<_>>(),
			[Capability::ExchangeCode, Capability::FetchUser]
		);
	}
}
