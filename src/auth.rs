//! Client identity and authorization-response primitives.

pub mod credential;
pub mod id;
pub mod secret;
pub mod sign_in;

pub use credential::*;
pub use id::*;
pub use secret::*;
pub use sign_in::*;
