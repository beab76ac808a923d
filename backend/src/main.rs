//! CropSage API server
//!
//! Predicts crop yield and field health from soil and nutrient measurements.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cropsage_backend::{
    create_app,
    ml::ModelStore,
    services::{AuthService, InMemoryUserDirectory, PredictionService},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cropsage_server=debug,cropsage_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting CropSage Server");
    tracing::info!("Environment: {}", config.environment);

    // Prepare models before accepting traffic
    let store = Arc::new(ModelStore::new(
        &config.models.dir,
        config.models.training_settings(),
    ));
    let retrain = config.models.retrain_on_startup;
    let bootstrap_store = Arc::clone(&store);
    tokio::task::spawn_blocking(move || {
        if retrain {
            tracing::info!("Retraining models on startup");
            bootstrap_store.train()
        } else {
            bootstrap_store.ensure_trained()
        }
    })
    .await
    .context("model bootstrap task panicked")?
    .context("preparing models")?;

    tracing::info!("Models ready");

    // Seed the user directory
    let directory =
        InMemoryUserDirectory::from_config(&config.auth).context("building user directory")?;

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        prediction: PredictionService::new(store),
        auth: AuthService::new(Arc::new(directory)),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
