use super::probe::{Check, CheckError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Script {
    Healthy,
    Failing(String),
    Erroring(String),
    NotConfigured,
}

/// Check answering with a fixed result, optionally after a delay.
#[derive(Debug, Clone)]
pub struct MockCheck {
    script: Script,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockCheck {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn healthy() -> Self {
        Self::scripted(Script::Healthy)
    }

    pub fn failing(reason: &str) -> Self {
        Self::scripted(Script::Failing(reason.to_string()))
    }

    pub fn erroring(message: &str) -> Self {
        Self::scripted(Script::Erroring(message.to_string()))
    }

    pub fn not_configured() -> Self {
        Self::scripted(Script::NotConfigured)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of how many times the check ran.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Check for MockCheck {
    async fn check(&self) -> Result<(), CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script {
            Script::Healthy => Ok(()),
            Script::Failing(reason) => Err(CheckError::failed(reason.clone())),
            Script::Erroring(message) => Err(anyhow::anyhow!(message.clone()).into()),
            Script::NotConfigured => Err(CheckError::NotConfigured),
        }
    }
}

/// Check that never completes.
pub struct PendingCheck;

#[async_trait]
impl Check for PendingCheck {
    async fn check(&self) -> Result<(), CheckError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

pub struct PanickingCheck;

#[async_trait]
impl Check for PanickingCheck {
    async fn check(&self) -> Result<(), CheckError> {
        panic!("table lookup exploded");
    }
}
