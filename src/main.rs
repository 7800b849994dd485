use healthwatch::configuration::get_configuration;
use healthwatch::startup::{build_aggregator, build_registry, get_connection_pool, run};
use healthwatch::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration()?;

    let subscriber = get_subscriber(
        "healthwatch".into(),
        settings.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    tracing::info!(
        db_host = %settings.database.host,
        db_port = settings.database.port,
        db_name = %settings.database.database_name,
        environment = %settings.environment,
        "Preparing PostgreSQL pool"
    );
    let pg_pool = get_connection_pool(&settings)?;

    let registry = build_registry(&settings, pg_pool)?;
    let aggregator = build_aggregator(&settings, registry);

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)?;

    run(listener, aggregator)?.await?;
    Ok(())
}
