use crate::health::probe::{Check, CheckError};
use async_trait::async_trait;
use sqlx::PgPool;

/// Issues a trivial query against the primary Postgres pool.
pub struct DatastoreCheck {
    pg_pool: PgPool,
}

impl DatastoreCheck {
    pub fn new(pg_pool: PgPool) -> Self {
        Self { pg_pool }
    }
}

#[async_trait]
impl Check for DatastoreCheck {
    #[tracing::instrument(name = "Check datastore health", skip(self))]
    async fn check(&self) -> Result<(), CheckError> {
        sqlx::query("SELECT 1 as health_check")
            .fetch_one(&self.pg_pool)
            .await?;
        Ok(())
    }
}
