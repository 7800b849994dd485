use async_trait::async_trait;
use healthwatch::health::{Check, CheckError, HealthAggregator, HealthMetrics, Probe, ProbeRegistry};
use healthwatch::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;
use std::sync::Arc;

lazy_static::lazy_static! {
    static ref TRACING: () = {
        // TEST_LOG=1 cargo test -- --nocapture to see the bunyan output
        if std::env::var("TEST_LOG").is_ok() {
            init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::stdout));
        } else {
            init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::sink));
        }
    };
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get_health(&self) -> reqwest::Response {
        self.client
            .get(&format!("{}/health", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_health_metrics(&self) -> reqwest::Response {
        self.client
            .get(&format!("{}/health/metrics", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app_with_aggregator(aggregator: HealthAggregator) -> TestApp {
    lazy_static::initialize(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = healthwatch::startup::run(listener, aggregator).expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

pub async fn spawn_app(probes: Vec<Probe>) -> TestApp {
    let mut registry = ProbeRegistry::new();
    for probe in probes {
        registry.register(probe).expect("Duplicate probe in test setup");
    }
    let aggregator = HealthAggregator::new(registry)
        .with_environment("test")
        .with_metrics(Arc::new(HealthMetrics::new(100)));

    spawn_app_with_aggregator(aggregator).await
}

/// Check with a fixed answer, standing in for a real dependency.
pub enum Stub {
    Ok,
    Fails(&'static str),
    NotConfigured,
    Hangs,
}

#[async_trait]
impl Check for Stub {
    async fn check(&self) -> Result<(), CheckError> {
        match self {
            Stub::Ok => Ok(()),
            Stub::Fails(reason) => Err(CheckError::failed(*reason)),
            Stub::NotConfigured => Err(CheckError::NotConfigured),
            Stub::Hangs => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}
