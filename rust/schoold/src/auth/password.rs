//! # Password hashing and verification (Argon2id)
//!
//! [`SecretHasher::hash`] draws a fresh salt from [`OsRng`] and returns a
//! PHC-format string (`$argon2id$v=19$m=19456,t=2,p=1$...`), which is what the
//! `users.password_hash` column stores. [`SecretHasher::verify`] parses such a
//! string and compares in constant time; the cost parameters embedded in the
//! stored hash win over the configured ones, so raising the cost later does not
//! lock out existing accounts.
//!
//! Both calls are CPU-bound (tens of milliseconds at the default cost). Callers
//! on the request path run them on a worker thread.
//!
//! [`SecretHasher::verify_dummy`] spends one verification against a hash made
//! at construction with the same cost, so a login for an unknown username
//! takes as long as one with a wrong password.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use std::sync::Arc;

use crate::error::ServiceError;

const DUMMY_SECRET: &str = "schoold-unknown-user";

#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
    dummy_hash: Arc<str>,
}

impl SecretHasher {
    /// Memory cost in KiB, iteration count and lane count.
    pub fn from_costs(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ServiceError::Configuration(format!("invalid hashing cost: {}", e)))?;
        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash(DUMMY_SECRET)?);
        Ok(hasher)
    }

    pub fn memory_kib(&self) -> u32 {
        self.params.m_cost()
    }

    pub fn iterations(&self) -> u32 {
        self.params.t_cost()
    }

    pub fn parallelism(&self) -> u32 {
        self.params.p_cost()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, secret: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ServiceError::Internal(format!("invalid stored password hash: {}", e)))?;
        match self.argon2().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(ServiceError::Internal(format!(
                "password verification failed: {}",
                e
            ))),
        }
    }

    /// Verifies `secret` against the construction-time hash and discards the
    /// outcome. Used where there is no stored hash to check.
    pub fn verify_dummy(&self, secret: &str) {
        if let Err(e) = self.verify(secret, &self.dummy_hash) {
            log::error!("dummy verification failed: {}", e);
        }
    }
}
