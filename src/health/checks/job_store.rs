use crate::health::probe::{Check, CheckError};
use async_trait::async_trait;
use sqlx::PgPool;

pub const TABLES_NOT_FOUND: &str = "tables_not_found";

/// Verifies that the background-job persistence table exists.
///
/// `table` is `None` when this deployment runs without a job backend.
pub struct JobStoreCheck {
    pg_pool: PgPool,
    table: Option<String>,
}

impl JobStoreCheck {
    pub fn new(pg_pool: PgPool, table: Option<String>) -> Self {
        Self { pg_pool, table }
    }
}

#[async_trait]
impl Check for JobStoreCheck {
    #[tracing::instrument(name = "Check job store health", skip(self), fields(table = ?self.table))]
    async fn check(&self) -> Result<(), CheckError> {
        let table = self.table.as_deref().ok_or(CheckError::NotConfigured)?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&self.pg_pool)
        .await?;

        if exists {
            Ok(())
        } else {
            tracing::warn!("Job table {} not found", table);
            Err(CheckError::failed(TABLES_NOT_FOUND))
        }
    }
}
