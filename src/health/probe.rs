use super::models::ProbeOutcome;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure signal raised by a [`Check`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The dependency is not part of this deployment.
    #[error("not_configured")]
    NotConfigured,
    /// The dependency answered, but not with what the check expected.
    #[error("{0}")]
    Failed(String),
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Cache(#[from] redis::RedisError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

impl From<CheckError> for ProbeOutcome {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::NotConfigured => ProbeOutcome::not_configured(),
            other => ProbeOutcome::unhealthy(other.to_string()),
        }
    }
}

/// A single attempt to exercise one dependency.
///
/// Implementations own their connections; whatever they acquire must be
/// released on drop, since a timed out check is aborted mid-flight.
#[async_trait]
pub trait Check: Send + Sync {
    async fn check(&self) -> Result<(), CheckError>;
}

/// A named, registered check with its failure policy.
#[derive(Clone)]
pub struct Probe {
    name: String,
    required: bool,
    timeout: Duration,
    check: Arc<dyn Check>,
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Aborts the spawned check when dropped, so it cannot outlive its execution.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Outcome of one execution together with how long it took.
#[derive(Debug, Clone)]
pub struct Execution {
    pub outcome: ProbeOutcome,
    pub elapsed_ms: u64,
}

impl Probe {
    pub fn new(name: impl Into<String>, required: bool, check: impl Check + 'static) -> Self {
        Self {
            name: name.into(),
            required,
            timeout: DEFAULT_PROBE_TIMEOUT,
            check: Arc::new(check),
        }
    }

    pub fn required(name: impl Into<String>, check: impl Check + 'static) -> Self {
        Self::new(name, true, check)
    }

    pub fn optional(name: impl Into<String>, check: impl Check + 'static) -> Self {
        Self::new(name, false, check)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the check on its own task, bounded by the probe timeout.
    ///
    /// Never fails: errors, panics and timeouts all become an outcome. The
    /// check is aborted once it outlives its timeout or this future is dropped.
    #[tracing::instrument(
        name = "Run probe",
        skip(self),
        fields(probe = %self.name, required = self.required)
    )]
    pub async fn execute(&self) -> Execution {
        let start = Instant::now();
        let check = Arc::clone(&self.check);
        let mut task = AbortOnDrop(tokio::spawn(async move { check.check().await }));

        let outcome = match timeout(self.timeout, &mut task.0).await {
            Ok(Ok(Ok(()))) => ProbeOutcome::Healthy,
            Ok(Ok(Err(err))) => ProbeOutcome::from(err),
            Ok(Err(join_err)) if join_err.is_panic() => {
                let payload = join_err.into_panic();
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                ProbeOutcome::unhealthy(format!("check panicked: {}", message))
            }
            Ok(Err(join_err)) => ProbeOutcome::unhealthy(format!("check aborted: {}", join_err)),
            Err(_) => ProbeOutcome::TimedOut,
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            ProbeOutcome::Unhealthy { reason } => {
                tracing::warn!(elapsed_ms, "Probe {} failed: {}", self.name, reason);
            }
            ProbeOutcome::TimedOut => {
                tracing::warn!(
                    elapsed_ms,
                    "Probe {} timed out after {:?}",
                    self.name,
                    self.timeout
                );
            }
            ProbeOutcome::Unavailable { .. } => {
                tracing::debug!("Probe {} is not configured", self.name);
            }
            ProbeOutcome::Healthy => {
                tracing::debug!(elapsed_ms, "Probe {} passed", self.name);
            }
        }

        Execution {
            outcome,
            elapsed_ms,
        }
    }
}
