use crate::health::HealthAggregator;
use actix_web::{get, web, HttpResponse};
use std::collections::BTreeMap;

/// Runs every probe and answers 200 (ok/degraded) or 503 (unhealthy).
///
/// Probe failures live in the body; this handler has no error path.
#[tracing::instrument(name = "Health check", skip(aggregator))]
#[get("")]
pub async fn health_check(aggregator: web::Data<HealthAggregator>) -> HttpResponse {
    let report = aggregator.run_all().await;
    HttpResponse::build(report.status_code()).json(report)
}

#[tracing::instrument(name = "Health metrics", skip(aggregator))]
#[get("/metrics")]
pub async fn health_metrics(aggregator: web::Data<HealthAggregator>) -> HttpResponse {
    match aggregator.metrics() {
        Some(metrics) => HttpResponse::Ok().json(metrics.all_stats().await),
        None => HttpResponse::Ok().json(BTreeMap::<String, ()>::new()),
    }
}
