//! # auth-adapters
//!
//! Implementations of the identity-issuance ports: JWT signing and
//! verification, confirmation-code generation with Argon2 hashing, and
//! code delivery.

mod codes;
mod dispatch;
mod jwt;

pub use codes::{ConfirmationCodes, DEFAULT_CODE_LENGTH};
pub use dispatch::LogDispatcher;
pub use jwt::JwtIssuer;
