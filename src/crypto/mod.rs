//! Credential handling for OnlineBank
//!
//! Provides Argon2id password hashing behind a swappable trait, and a
//! zeroizing string for plaintext passwords in transit.

pub mod password;
pub mod secure_memory;

pub use password::{Argon2Hasher, CredentialHasher, HashingParams};
pub use secure_memory::SecureString;
