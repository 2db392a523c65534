use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::IdentityDirectory;
use crate::error::AppError;
use crate::models::{Identity, NewIdentity, Role};

/// Process-local directory. Used when no `DATABASE_URL` is configured, and in tests.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every identity sharing `unique_key`; more than one would mean the uniqueness rule broke.
    #[cfg(test)]
    pub async fn matching(&self, unique_key: &str) -> Vec<Identity> {
        self.identities
            .read()
            .await
            .values()
            .filter(|identity| identity.unique_key == unique_key)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn find_by_key(&self, unique_key: &str) -> Result<Identity, AppError> {
        self.identities
            .read()
            .await
            .values()
            .find(|identity| identity.unique_key == unique_key)
            .cloned()
            .ok_or_else(|| AppError::NotFound("identity not found".into()))
    }

    async fn insert(&self, identity: NewIdentity) -> Result<Identity, AppError> {
        let mut identities = self.identities.write().await;
        if identities
            .values()
            .any(|existing| existing.unique_key == identity.unique_key)
        {
            return Err(AppError::DuplicateIdentity);
        }

        let stored = Identity {
            id: Uuid::new_v4(),
            unique_key: identity.unique_key,
            credential_hash: identity.credential_hash,
            role: identity.role,
        };
        identities.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn promote(&self, id: Uuid) -> Result<Identity, AppError> {
        let mut identities = self.identities.write().await;
        let identity = identities
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("identity not found".into()))?;
        identity.role = Role::Admin;
        Ok(identity.clone())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.identities.read().await.len() as u64)
    }
}
