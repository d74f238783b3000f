use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use farewatch_api::{app, AppState};
use farewatch_catalog::{DealScorer, SearchPlanner};
use farewatch_core::{DestinationCatalog, MockSearchProvider};
use farewatch_deals::DealStore;
use farewatch_discovery::{log_progress, DiscoveryContext, DiscoveryLoop};
use farewatch_store::{JsonDealRepository, JsonSettingsRepository};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farewatch_api=debug,farewatch_discovery=debug,farewatch_deals=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farewatch_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Farewatch API on port {}", config.server.port);

    let deals = DealStore::open(
        Arc::new(JsonDealRepository::new(&config.storage.deals_file)),
        config.deals.clone(),
    )
    .await;

    let ctx = DiscoveryContext::bootstrap(
        Arc::new(JsonSettingsRepository::new(&config.storage.settings_file)),
        deals,
        Arc::new(MockSearchProvider::new()),
        SearchPlanner::new(DestinationCatalog::default()),
        DealScorer::new(config.scoring.clone()),
    )
    .await;
    let ctx = Arc::new(ctx);

    let discovery = DiscoveryLoop::new(ctx.clone(), config.discovery.clone());
    if config.discovery.autostart {
        discovery.start();
    }
    let state = AppState::new(discovery);

    let shutdown = CancellationToken::new();
    tokio::spawn(log_progress(
        ctx,
        Duration::from_secs(config.discovery.progress_log_secs.max(1)),
        shutdown.clone(),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind listener");
    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    state.discovery.stop();
    shutdown.cancel();
    tracing::info!("Farewatch API shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
