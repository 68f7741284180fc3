use recipe_catalog::{
    api::{build_router, AppState},
    catalog::CatalogService,
    config::Config,
    seed::{seed_catalog, SeedFixture},
    state::create_store,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize tracing
    init_tracing(&config);
    if let Some(e) = config_error {
        tracing::warn!("Failed to load configuration: {}", e);
        tracing::warn!("Using default configuration");
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting Recipe Catalog v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = recipe_catalog::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("✅ Prometheus metrics initialized");
        }
    } else {
        tracing::info!("⚠️  Prometheus metrics disabled in configuration");
    }

    // Initialize storage backend
    tracing::info!("Storage backend: {:?}", config.state.backend);
    let store = create_store(&config.state)?;
    tracing::info!("✅ Storage backend initialized");

    // Seed sample data
    if config.seed.on_startup {
        let fixture = SeedFixture::load(config.seed.fixture_path.as_deref())?;
        let report = seed_catalog(store.as_ref(), &fixture).await?;
        tracing::info!(
            recipes = report.recipes,
            created = report.total_created(),
            "✅ Catalog seeded"
        );
    }

    let catalog = Arc::new(CatalogService::new(store));
    let app = build_router(AppState::new(catalog));

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "recipe_catalog={},tower_http={}",
            config.observability.log_level, config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
