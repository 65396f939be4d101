//! OAuth client-credentials token issuance.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
