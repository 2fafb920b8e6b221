//! Password hashing.
//!
//! Hashes are standard bcrypt strings (`$2b$<cost>$<salt+digest>`). The cost travels with
//! the hash, so raising the configured work factor only affects new hashes.

use crate::error::IdentityError;
use std::fmt::Debug;

const SALT_LEN: usize = 16;
/// Work factor bounds. The upper bound also applies when verifying, so a forged hash
/// cannot stall the process.
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 16;

/// Hashes and verifies passwords. The rest of the system only sees encoded hashes.
pub trait CredentialHasher: Debug + Send + Sync + 'static {
    fn hash(&self, password: &str) -> Result<String, IdentityError>;

    /// `false` for a wrong password and for hashes this hasher cannot read.
    fn verify(&self, password: &str, encoded: &str) -> bool;
}

/// bcrypt with a configurable work factor.
///
/// `security.hash_iterations` is the number of key-expansion rounds: it is rounded down
/// to a power of two and clamped to `2^4..=2^16`, so `4096` is cost 12.
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentials {
    cost: u32,
}

impl Default for BcryptCredentials {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

impl BcryptCredentials {
    pub const DEFAULT_ITERATIONS: u32 = 1 << bcrypt::DEFAULT_COST;

    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        let cost = if iterations == 0 { 0 } else { iterations.ilog2() };
        let cost = if cost < MIN_COST {
            MIN_COST
        } else if cost > MAX_COST {
            MAX_COST
        } else {
            cost
        };
        Self { cost }
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl CredentialHasher for BcryptCredentials {
    fn hash(&self, password: &str) -> Result<String, IdentityError> {
        let mut salt = [0u8; SALT_LEN];
        getrandom::fill(&mut salt).map_err(|e| IdentityError::Credential {
            message: e.to_string().into(),
            context: Some("System RNG unavailable for salt generation".into()),
        })?;

        let parts =
            bcrypt::hash_with_salt(password, self.cost, salt).map_err(|e| IdentityError::Credential {
                message: e.to_string().into(),
                context: Some("Hashing password".into()),
            })?;
        Ok(parts.format_for_version(bcrypt::Version::TwoB))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        if stored_cost(encoded).is_none_or(|cost| !(MIN_COST..=MAX_COST).contains(&cost)) {
            tracing::warn!("Unreadable credential hash");
            return false;
        }

        bcrypt::verify(password, encoded).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Unreadable credential hash");
            false
        })
    }
}

/// Cost field of a `$2?$NN$...` string.
fn stored_cost(encoded: &str) -> Option<u32> {
    let mut parts = encoded.split('$');
    let (Some(""), Some(version), Some(cost), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    if !matches!(version, "2a" | "2b" | "2x" | "2y") || cost.len() != 2 {
        return None;
    }
    cost.parse().ok()
}
