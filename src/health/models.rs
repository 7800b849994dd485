use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Wire value for a dependency that is not part of this deployment.
pub const NOT_CONFIGURED: &str = "not_configured";
/// Error reason rendered for a probe that ran out of time.
pub const TIMEOUT_REASON: &str = "timeout";

/// Result of a single probe execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Unhealthy { reason: String },
    /// The dependency is absent from the running configuration.
    Unavailable { reason: String },
    TimedOut,
}

impl ProbeOutcome {
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self::Unhealthy {
            reason: reason.into(),
        }
    }

    pub fn not_configured() -> Self {
        Self::Unavailable {
            reason: NOT_CONFIGURED.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Unhealthy and timed out outcomes count against the overall status,
    /// unavailable ones never do.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Unhealthy { .. } | Self::TimedOut)
    }
}

impl Serialize for ProbeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Healthy => serializer.serialize_str("ok"),
            Self::Unavailable { .. } => serializer.serialize_str(NOT_CONFIGURED),
            Self::Unhealthy { reason } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", reason)?;
                map.end()
            }
            Self::TimedOut => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", TIMEOUT_REASON)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    #[serde(rename = "ok")]
    Healthy,
    Degraded,
    Unhealthy,
}

impl OverallStatus {
    /// Derives the overall status from `(required, outcome)` pairs.
    ///
    /// A failed required probe makes the whole report unhealthy, a failed
    /// optional probe only degrades it.
    pub fn classify<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (bool, &'a ProbeOutcome)>,
    {
        let mut status = Self::Healthy;
        for (required, outcome) in outcomes {
            if !outcome.is_failure() {
                continue;
            }
            if required {
                return Self::Unhealthy;
            }
            status = Self::Degraded;
        }
        status
    }

    /// Degraded is advisory and still answers with success.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Healthy | Self::Degraded => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: IndexMap<String, ProbeOutcome>,
}

impl HealthReport {
    pub fn new(
        status: OverallStatus,
        checks: IndexMap<String, ProbeOutcome>,
        environment: String,
        uptime_seconds: u64,
    ) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            environment,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == OverallStatus::Healthy
    }

    pub fn status_code(&self) -> StatusCode {
        self.status.status_code()
    }
}
