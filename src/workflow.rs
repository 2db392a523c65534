//! Registration, login and promotion.
//!
//! bcrypt is deliberately slow, so hashing and comparison run on tokio's blocking pool
//! and never hold a lock shared with other requests. Every directory call is bounded by
//! a deadline; one that overruns fails with `DatabaseError`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::auth::{PasswordHasher, TokenCodec};
use crate::directory::IdentityDirectory;
use crate::error::AppError;
use crate::models::{NewIdentity, PublicIdentity, Role};

pub const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CredentialWorkflow {
    directory: Arc<dyn IdentityDirectory>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<dyn TokenCodec>,
    directory_timeout: Duration,
}

impl CredentialWorkflow {
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            directory,
            hasher,
            codec,
            directory_timeout: DEFAULT_DIRECTORY_TIMEOUT,
        }
    }

    pub fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.directory_timeout, call)
            .await
            .map_err(|_| {
                log::error!(
                    "identity directory did not answer within {:?}",
                    self.directory_timeout
                );
                AppError::DatabaseError("identity directory timed out".into())
            })?
    }

    /// The codec the request gate verifies with. Same instance that signs login tokens.
    pub fn codec(&self) -> Arc<dyn TokenCodec> {
        self.codec.clone()
    }

    /// Creates an identity. The first one in an empty directory becomes admin.
    ///
    /// Two concurrent registrations for the same key can both pass the lookup; the
    /// directory's own uniqueness check decides which insert wins.
    pub async fn register(
        &self,
        unique_key: &str,
        secret: &str,
    ) -> Result<PublicIdentity, AppError> {
        match self.bounded(self.directory.find_by_key(unique_key)).await {
            Ok(_) => return Err(AppError::DuplicateIdentity),
            Err(AppError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }

        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        let credential_hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AppError::HashingFailure(e.to_string()))?
            .map_err(|e| match e {
                AppError::HashingFailure(_) => e,
                other => AppError::HashingFailure(other.to_string()),
            })?;

        let role = if self.bounded(self.directory.count()).await? == 0 {
            Role::Admin
        } else {
            Role::Regular
        };

        let identity = self
            .bounded(self.directory.insert(NewIdentity {
                unique_key: unique_key.to_string(),
                credential_hash,
                role,
            }))
            .await?;

        log::info!("registered identity {} with role {}", identity.id, identity.role);
        Ok(identity.into_public())
    }

    /// Exchanges a key and secret for a token carrying the identity's current role.
    ///
    /// Unknown key and wrong secret fail identically with `InvalidCredentials`.
    pub async fn login(&self, unique_key: &str, secret: &str) -> Result<String, AppError> {
        let identity = match self.bounded(self.directory.find_by_key(unique_key)).await {
            Ok(identity) => identity,
            Err(AppError::NotFound(_)) => {
                log::warn!("rejected login attempt");
                return Err(AppError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        };

        let hasher = self.hasher.clone();
        let candidate = secret.to_string();
        let hashed = identity.credential_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.compare(&candidate, &hashed))
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        if !matches {
            log::warn!("rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }

        self.codec.issue(&identity.unique_key, identity.role)
    }

    /// Elevates an identity to admin. Tokens it already holds keep their old role.
    pub async fn promote(&self, id: Uuid) -> Result<PublicIdentity, AppError> {
        let identity = self.bounded(self.directory.promote(id)).await?;
        log::info!("promoted identity {} to {}", identity.id, identity.role);
        Ok(identity.into_public())
    }
}
