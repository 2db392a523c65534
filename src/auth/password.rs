use crate::error::AppError;

/// One-way salted hashing of credentials.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `secret` with a fresh salt. Two calls with the same input give different outputs.
    fn hash(&self, secret: &str) -> Result<String, AppError>;

    /// Checks `candidate` against a stored hash. A malformed hash is a mismatch, not an error.
    fn compare(&self, candidate: &str, hashed: &str) -> bool;
}

/// bcrypt with a configurable cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(secret, self.cost)?)
    }

    fn compare(&self, candidate: &str, hashed: &str) -> bool {
        bcrypt::verify(candidate, hashed).unwrap_or(false)
    }
}
