//! Credential models and the issuers that sign them.

pub mod credential;
pub mod issuer;
pub mod secret;

pub use credential::*;
pub use issuer::*;
pub use secret::*;
