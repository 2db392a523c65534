use std::sync::Arc;

use crate::auth::{BcryptHasher, JwtCodec, TokenCodec};
use crate::config::Config;
use crate::directory::{IdentityDirectory, InMemoryDirectory, PgDirectory};
use crate::error::AppError;
use crate::tasks::TaskStore;
use crate::workflow::CredentialWorkflow;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub workflow: CredentialWorkflow,
    pub tasks: TaskStore,
}

impl AppState {
    pub fn new(workflow: CredentialWorkflow) -> Self {
        Self {
            workflow,
            tasks: TaskStore::new(),
        }
    }

    /// Builds the production state: bcrypt at the configured cost, an HS256 codec, and a
    /// Postgres directory when `DATABASE_URL` is set (in-memory otherwise).
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let directory: Arc<dyn IdentityDirectory> = match &config.database_url {
            Some(url) => {
                let directory = PgDirectory::connect(url).await?;
                directory.ensure_schema().await?;
                log::info!("identities stored in postgres");
                Arc::new(directory)
            }
            None => {
                log::warn!("DATABASE_URL not set, identities are kept in memory");
                Arc::new(InMemoryDirectory::new())
            }
        };
        let codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(&config.jwt_secret)?);

        let workflow = CredentialWorkflow::new(
            directory,
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            codec,
        )
        .with_directory_timeout(config.directory_timeout);
        Ok(Self::new(workflow))
    }

    pub fn codec(&self) -> Arc<dyn TokenCodec> {
        self.workflow.codec()
    }
}
