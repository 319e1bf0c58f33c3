//! Provider descriptors (data) and adapters (behavior).
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering endpoints,
//! capability flags, and wire quirks (form POST versus query GET, `grant_type` emission).
//! `adapter` defines [`ProviderAdapter`], the one contract every provider implements, and the
//! `google`, `facebook`, and `mercado_livre` modules supply the concrete adapters plus their
//! request and token types.

pub mod adapter;
pub mod descriptor;
pub mod facebook;
pub mod google;
pub mod mercado_livre;

pub use adapter::*;
pub use descriptor::*;
pub use facebook::{FacebookAccessTokenResponse, FacebookAdapter, FacebookAuthorizationRequest};
pub use google::{GoogleAccessTokenResponse, GoogleAdapter, GoogleAuthorizationRequest};
pub use mercado_livre::{
	MercadoLivreAccessTokenResponse, MercadoLivreAdapter, MercadoLivreAuthorizationRequest,
};
