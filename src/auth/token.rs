use crate::error::AppError;
use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of every issued token. There is no renewal.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The identity's unique key (email).
    pub sub: String,
    /// Role at issuance time. Not refreshed until the next login.
    pub role: Role,
    /// Issued at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch.
    pub exp: i64,
}

/// Encodes and verifies signed, expiring identity assertions.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, subject: &str, role: Role) -> Result<String, AppError>;

    /// Any failure (bad signature, malformed, expired, missing claims) is `AppError::InvalidToken`.
    fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 codec keyed by a shared secret.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    /// Builds a codec from the signing secret.
    ///
    /// Returns `AppError::Configuration` for an empty secret.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Configuration("JWT secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issues a token as if it were minted at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expires_at = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.issue_at(subject, role, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}
