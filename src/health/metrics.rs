use super::models::ProbeOutcome;
use super::probe::Execution;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Utc>,
    pub probe: String,
    pub outcome: ProbeOutcome,
    pub elapsed_ms: u64,
}

/// Aggregated view over the recorded history of one probe.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProbeStats {
    pub total_checks: usize,
    pub ok_count: usize,
    pub failed_count: usize,
    pub timed_out_count: usize,
    pub not_configured_count: usize,
    pub availability_percentage: String,
    pub avg_response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_response_time_ms: Option<u64>,
}

/// Bounded history of probe executions, oldest evicted first.
///
/// Reports are never served from here; this only feeds `/health/metrics`.
pub struct HealthMetrics {
    snapshots: RwLock<VecDeque<MetricSnapshot>>,
    max_snapshots: usize,
}

impl HealthMetrics {
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            snapshots: RwLock::new(VecDeque::with_capacity(max_snapshots)),
            max_snapshots,
        }
    }

    pub async fn record(&self, probe: &str, execution: &Execution) {
        if self.max_snapshots == 0 {
            return;
        }
        let snapshot = MetricSnapshot {
            timestamp: Utc::now(),
            probe: probe.to_string(),
            outcome: execution.outcome.clone(),
            elapsed_ms: execution.elapsed_ms,
        };

        let mut snapshots = self.snapshots.write().await;
        snapshots.push_back(snapshot);
        while snapshots.len() > self.max_snapshots {
            snapshots.pop_front();
        }
    }

    pub async fn probe_stats(&self, probe: &str) -> Option<ProbeStats> {
        let snapshots = self.snapshots.read().await;
        summarize(snapshots.iter().filter(|s| s.probe == probe))
    }

    pub async fn all_stats(&self) -> BTreeMap<String, ProbeStats> {
        let snapshots = self.snapshots.read().await;
        let mut grouped: BTreeMap<&str, Vec<&MetricSnapshot>> = BTreeMap::new();
        for snapshot in snapshots.iter() {
            grouped
                .entry(snapshot.probe.as_str())
                .or_default()
                .push(snapshot);
        }

        grouped
            .into_iter()
            .filter_map(|(probe, history)| {
                summarize(history.into_iter()).map(|stats| (probe.to_string(), stats))
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn clear(&self) {
        let mut snapshots = self.snapshots.write().await;
        snapshots.clear();
    }
}

fn summarize<'a>(history: impl Iterator<Item = &'a MetricSnapshot>) -> Option<ProbeStats> {
    let mut stats = ProbeStats::default();
    let mut response_times = Vec::new();

    for snapshot in history {
        stats.total_checks += 1;
        match snapshot.outcome {
            ProbeOutcome::Healthy => stats.ok_count += 1,
            ProbeOutcome::Unhealthy { .. } => stats.failed_count += 1,
            ProbeOutcome::TimedOut => {
                stats.failed_count += 1;
                stats.timed_out_count += 1;
            }
            ProbeOutcome::Unavailable { .. } => stats.not_configured_count += 1,
        }
        // Unavailable probes never touch the dependency, their timing says nothing.
        if !matches!(snapshot.outcome, ProbeOutcome::Unavailable { .. }) {
            response_times.push(snapshot.elapsed_ms);
        }
    }

    if stats.total_checks == 0 {
        return None;
    }

    let availability = (stats.ok_count as f64 / stats.total_checks as f64) * 100.0;
    stats.availability_percentage = format!("{:.2}", availability);
    if !response_times.is_empty() {
        stats.avg_response_time_ms =
            response_times.iter().sum::<u64>() / response_times.len() as u64;
    }
    stats.min_response_time_ms = response_times.iter().min().copied();
    stats.max_response_time_ms = response_times.iter().max().copied();

    Some(stats)
}
