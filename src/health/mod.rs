mod aggregator;
pub mod checks;
mod metrics;
#[cfg(test)]
pub(crate) mod mock;
mod models;
mod probe;
mod registry;

pub use aggregator::HealthAggregator;
pub use metrics::{HealthMetrics, MetricSnapshot, ProbeStats};
pub use models::{HealthReport, OverallStatus, ProbeOutcome, NOT_CONFIGURED, TIMEOUT_REASON};
pub use probe::{Check, CheckError, Execution, Probe, DEFAULT_PROBE_TIMEOUT};
pub use registry::{DuplicateProbeError, ProbeRegistry};
