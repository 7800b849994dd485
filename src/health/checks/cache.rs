use crate::health::probe::{Check, CheckError};
use async_trait::async_trait;

pub const WRITE_FAILED: &str = "write_failed";
const CHECK_VALUE: &str = "ok";
const KEY_TTL_SECONDS: u64 = 60;

enum Target {
    NotConfigured,
    Client(redis::Client),
    /// The configured url did not parse; reported on every check.
    Invalid(redis::ErrorKind, String),
}

/// Write-then-read round trip through Redis with a unique key.
pub struct CacheCheck {
    target: Target,
}

impl CacheCheck {
    pub fn new(client: Option<redis::Client>) -> Self {
        let target = match client {
            Some(client) => Target::Client(client),
            None => Target::NotConfigured,
        };
        Self { target }
    }

    /// Opens a client for `url`. Nothing connects until the first check, and
    /// a malformed url surfaces as a failed check rather than a startup error.
    pub fn from_url(url: Option<&str>) -> Self {
        let target = match url.map(redis::Client::open) {
            None => Target::NotConfigured,
            Some(Ok(client)) => Target::Client(client),
            Some(Err(e)) => {
                tracing::warn!("Invalid cache url: {}", e);
                Target::Invalid(e.kind(), e.to_string())
            }
        };
        Self { target }
    }

    fn unique_key() -> String {
        format!("health_check_{}", uuid::Uuid::new_v4())
    }
}

#[async_trait]
impl Check for CacheCheck {
    #[tracing::instrument(name = "Check cache health", skip(self))]
    async fn check(&self) -> Result<(), CheckError> {
        let client = match &self.target {
            Target::NotConfigured => return Err(CheckError::NotConfigured),
            Target::Invalid(kind, detail) => {
                let err = redis::RedisError::from((*kind, "invalid cache url", detail.clone()));
                return Err(CheckError::Cache(err));
            }
            Target::Client(client) => client,
        };
        let mut conn = client.get_multiplexed_async_connection().await?;
        let key = Self::unique_key();

        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(CHECK_VALUE)
            .arg("EX")
            .arg(KEY_TTL_SECONDS)
            .query_async(&mut conn)
            .await?;
        let value: Option<String> = redis::cmd("GET").arg(&key).query_async(&mut conn).await?;

        let cleanup: redis::RedisResult<()> =
            redis::cmd("DEL").arg(&key).query_async(&mut conn).await;
        if let Err(e) = cleanup {
            tracing::debug!("Failed to delete cache check key {}: {:?}", key, e);
        }

        match value.as_deref() {
            Some(CHECK_VALUE) => Ok(()),
            _ => Err(CheckError::failed(WRITE_FAILED)),
        }
    }
}
