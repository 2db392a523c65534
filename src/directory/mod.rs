//! Identity persistence.
//!
//! The credential workflow only talks to [`IdentityDirectory`]; which store sits behind it
//! is decided once, when the application state is built.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Identity, NewIdentity};

pub use memory::InMemoryDirectory;
pub use postgres::PgDirectory;

#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Exact, case-sensitive lookup. `AppError::NotFound` when absent.
    async fn find_by_key(&self, unique_key: &str) -> Result<Identity, AppError>;

    /// Stores an identity whose hash and role are already resolved, assigning its id.
    ///
    /// A key that already exists is rejected with `AppError::DuplicateIdentity`.
    async fn insert(&self, identity: NewIdentity) -> Result<Identity, AppError>;

    /// Sets the role to admin. Promoting an admin again is a no-op success.
    async fn promote(&self, id: Uuid) -> Result<Identity, AppError>;

    /// Number of stored identities.
    async fn count(&self) -> Result<u64, AppError>;
}
