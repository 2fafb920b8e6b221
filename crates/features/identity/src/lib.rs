//! Student accounts.
//!
//! [`StudentAccounts`] registers, finds, updates and authenticates students on top of
//! any [`EntityStore`](registrar_storage::EntityStore). Passwords only ever reach the
//! [`CredentialHasher`]; records carry the encoded hash.

mod accounts;
mod credentials;
mod error;

pub use accounts::{NewStudent, StudentAccounts};
pub use credentials::{CredentialHasher, BcryptCredentials};
pub use error::{IdentityError, IdentityErrorExt};
