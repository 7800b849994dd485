use super::metrics::HealthMetrics;
use super::models::{HealthReport, OverallStatus};
use super::registry::ProbeRegistry;
use futures::future::join_all;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;

/// Runs every registered probe and assembles a fresh [`HealthReport`].
///
/// Cheap to clone; clones share the same frozen registry.
#[derive(Clone)]
pub struct HealthAggregator {
    registry: Arc<ProbeRegistry>,
    metrics: Option<Arc<HealthMetrics>>,
    environment: String,
    start_time: Instant,
}

impl HealthAggregator {
    pub fn new(registry: ProbeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            metrics: None,
            environment: "development".to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<HealthMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> Option<&Arc<HealthMetrics>> {
        self.metrics.as_ref()
    }

    #[tracing::instrument(
        name = "Aggregate health",
        skip(self),
        fields(probes = self.registry.len())
    )]
    pub async fn run_all(&self) -> HealthReport {
        let probes = self.registry.list();
        let executions = join_all(probes.iter().map(|probe| probe.execute())).await;

        let status = OverallStatus::classify(
            probes
                .iter()
                .zip(executions.iter())
                .map(|(probe, execution)| (probe.is_required(), &execution.outcome)),
        );

        if let Some(metrics) = &self.metrics {
            for (probe, execution) in probes.iter().zip(executions.iter()) {
                metrics.record(probe.name(), execution).await;
            }
        }

        let checks: IndexMap<String, _> = probes
            .iter()
            .zip(executions)
            .map(|(probe, execution)| (probe.name().to_string(), execution.outcome))
            .collect();

        if status != OverallStatus::Healthy {
            tracing::warn!("Health report is {:?}", status);
        }

        HealthReport::new(
            status,
            checks,
            self.environment.clone(),
            self.start_time.elapsed().as_secs(),
        )
    }
}
