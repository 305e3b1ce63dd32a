//! Password hashing using Argon2id
//!
//! Account passwords are never stored in plaintext. Each call to `hash`
//! draws a fresh salt and produces a self-describing PHC string
//! (`$argon2id$v=19$m=...`), so verification needs nothing but the stored
//! string and the candidate password.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{BankError, BankResult};

/// A swappable password hashing strategy
pub trait CredentialHasher {
    /// Produce a salted hash of `password`
    fn hash(&self, password: &str) -> BankResult<String>;

    /// Check `password` against a stored hash
    ///
    /// Returns false on mismatch and on a malformed stored hash.
    fn verify(&self, hash: &str, password: &str) -> bool;
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism degree (default: 1)
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id-backed [`CredentialHasher`]
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters
    pub fn new(params: &HashingParams) -> BankResult<Self> {
        let argon2_params = Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            None,
        )
        .map_err(|e| BankError::Config(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> BankResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| BankError::Hashing(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, hash: &str, password: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("stored password hash is malformed: {}", e);
                return false;
            }
        };

        // Cost parameters come from the PHC string itself
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
