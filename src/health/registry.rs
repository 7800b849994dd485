//! Ordered set of probes fixed at process start.
//!
//! Registration happens during bootstrap only. Once the registry is handed to
//! [`HealthAggregator`](super::HealthAggregator) it is shared behind an `Arc`
//! and never mutated again, so concurrent health checks read it without locks.

use super::probe::Probe;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("probe `{name}` is already registered")]
pub struct DuplicateProbeError {
    pub name: String,
}

#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: Vec<Probe>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a probe at the end of the registration order.
    pub fn register(&mut self, probe: Probe) -> Result<(), DuplicateProbeError> {
        if self.probes.iter().any(|p| p.name() == probe.name()) {
            return Err(DuplicateProbeError {
                name: probe.name().to_string(),
            });
        }
        tracing::debug!(
            probe = probe.name(),
            required = probe.is_required(),
            timeout_ms = probe.timeout().as_millis() as u64,
            "Registered probe"
        );
        self.probes.push(probe);
        Ok(())
    }

    pub fn list(&self) -> &[Probe] {
        &self.probes
    }

    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(Probe::name).collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::mock::MockCheck;

    #[test]
    fn keeps_registration_order() {
        let mut registry = ProbeRegistry::new();
        for name in ["datastore", "search_index", "job_store", "cache"] {
            registry
                .register(Probe::required(name, MockCheck::healthy()))
                .unwrap();
        }

        assert_eq!(
            registry.names(),
            vec!["datastore", "search_index", "job_store", "cache"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Probe::required("cache", MockCheck::healthy()))
            .unwrap();

        let err = registry
            .register(Probe::optional("cache", MockCheck::failing("write_failed")))
            .unwrap_err();

        assert_eq!(err.name, "cache");
        assert_eq!(err.to_string(), "probe `cache` is already registered");
        assert_eq!(registry.len(), 1);
        assert!(registry.list()[0].is_required());
    }
}
