use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use neptune_search::config::{LoggingSettings, Settings};
use neptune_search::routes::{self, AppState};
use neptune_search::{CompletionClient, Synthesizer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration comes first so the subscriber can honour logging.level;
    // a failure here is reported on stderr before logging exists.
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        config_error(e)
    })?;

    init_logging(&settings.logging);

    info!("Starting Neptune search service...");
    info!("Configuration loaded: {:?}", settings.provider);

    let completion = CompletionClient::new(&settings.provider).map_err(|e| {
        error!("Failed to build completion client: {}", e);
        config_error(e)
    })?;

    info!(
        "Completion client initialized (model: {}, timeout: {}s)",
        completion.model(),
        settings.provider.timeout_secs
    );

    let synthesizer = Synthesizer::with_builtin_catalog();

    info!("Reference catalog loaded ({} records)", synthesizer.catalog().len());

    // Build application state
    let app_state = AppState::new(synthesizer, completion, settings.search.max_query_chars);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
