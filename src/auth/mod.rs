pub mod authorize;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use authorize::RequireRole;
pub use extractors::AuthContext;
pub use middleware::Authenticate;
pub use password::{BcryptHasher, PasswordHasher};
pub use token::{Claims, JwtCodec, TokenCodec};

/// Represents the payload for a user login request.
///
/// Only the shape is checked. Any well-formed pair that does not match a stored
/// identity is rejected as invalid credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// The identity's unique key. Stored as given; no case folding.
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
