use crate::configuration::Settings;
use crate::health::checks::{CacheCheck, DatastoreCheck, JobStoreCheck, SearchIndexCheck};
use crate::health::{HealthAggregator, HealthMetrics, Probe, ProbeRegistry};
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub const DATASTORE: &str = "datastore";
pub const SEARCH_INDEX: &str = "search_index";
pub const JOB_STORE: &str = "job_store";
pub const CACHE: &str = "cache";

/// Lazily connecting pool, so an unreachable database shows up in the
/// health report instead of preventing startup.
pub fn get_connection_pool(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(settings.database.acquire_timeout())
        .connect_lazy(&settings.database.connection_string())
}

/// Registers one probe per dependency, in report order.
///
/// Dependencies without connection settings are still registered and report
/// `not_configured`.
pub fn build_registry(settings: &Settings, pg_pool: PgPool) -> anyhow::Result<ProbeRegistry> {
    let health = &settings.health;
    let http_client = reqwest::Client::builder()
        .timeout(health.timeout(settings.search_index.timeout_ms))
        .build()?;

    let mut registry = ProbeRegistry::new();
    registry.register(
        Probe::new(
            DATASTORE,
            settings.database.required,
            DatastoreCheck::new(pg_pool.clone()),
        )
        .with_timeout(health.timeout(settings.database.timeout_ms)),
    )?;
    registry.register(
        Probe::new(
            SEARCH_INDEX,
            settings.search_index.required,
            SearchIndexCheck::new(http_client, settings.search_index.url.clone()),
        )
        .with_timeout(health.timeout(settings.search_index.timeout_ms)),
    )?;
    registry.register(
        Probe::new(
            JOB_STORE,
            settings.job_store.required,
            JobStoreCheck::new(pg_pool, settings.job_store.table.clone()),
        )
        .with_timeout(health.timeout(settings.job_store.timeout_ms)),
    )?;
    registry.register(
        Probe::new(
            CACHE,
            settings.cache.required,
            CacheCheck::from_url(settings.cache.url.as_deref()),
        )
        .with_timeout(health.timeout(settings.cache.timeout_ms)),
    )?;

    Ok(registry)
}

pub fn build_aggregator(settings: &Settings, registry: ProbeRegistry) -> HealthAggregator {
    HealthAggregator::new(registry)
        .with_environment(settings.environment.clone())
        .with_metrics(Arc::new(HealthMetrics::new(settings.health.history_size)))
}

pub fn run(listener: TcpListener, aggregator: HealthAggregator) -> Result<Server, std::io::Error> {
    tracing::info!(
        probes = ?aggregator.registry().names(),
        "Serving health checks"
    );
    let aggregator = web::Data::new(aggregator);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(aggregator.clone())
            .service(
                web::scope("/health")
                    .service(routes::health_check)
                    .service(routes::health_metrics),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
