use crate::health::probe::{Check, CheckError};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ClusterHealth {
    status: Option<String>,
}

/// Queries `/_cluster/health` on an Elasticsearch-compatible search index.
pub struct SearchIndexCheck {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl SearchIndexCheck {
    pub fn new(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    fn health_url(base_url: &str) -> String {
        format!("{}/_cluster/health", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Check for SearchIndexCheck {
    #[tracing::instrument(name = "Check search index health", skip(self))]
    async fn check(&self) -> Result<(), CheckError> {
        let base_url = self.base_url.as_deref().ok_or(CheckError::NotConfigured)?;

        let response = self.client.get(Self::health_url(base_url)).send().await?;
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(CheckError::failed(format!(
                "search index returned status: {}",
                status_code
            )));
        }

        // Any answer counts as reachable; only a red cluster is a failure.
        match response.json::<ClusterHealth>().await {
            Ok(ClusterHealth {
                status: Some(status),
            }) if status == "red" => Err(CheckError::failed("cluster status red")),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::debug!("Unreadable cluster health body: {:?}", e);
                Ok(())
            }
        }
    }
}
