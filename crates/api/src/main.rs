use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arcana_api::config::ServerConfig;
use arcana_api::router::build_app_router;
use arcana_api::state::AppState;
use arcana_api::store::SessionStore;
use arcana_astro::{
    ChartEngine, FixedOffsetResolver, HttpEphemeris, HttpTimezoneResolver, NominatimClient,
    TimezoneResolver,
};
use arcana_oracle::OracleClient;
use arcana_payments::StripeGateway;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcana_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Payment gateway ---
    let gateway = StripeGateway::new(config.stripe_secret_key.clone())
        .expect("Failed to build payment gateway client");

    // --- Generation service ---
    let oracle = OracleClient::new(
        config.oracle_base_url.clone(),
        config.oracle_api_key.clone(),
        config.oracle_model.clone(),
    )
    .expect("Failed to build generation service client");

    // --- Chart engine ---
    let geocoder = NominatimClient::new(
        config.geocoder_base_url.clone(),
        &config.geocoder_user_agent,
    )
    .expect("Failed to build geocoder client");

    let timezones: Arc<dyn TimezoneResolver> = match &config.timezone_base_url {
        Some(url) => Arc::new(
            HttpTimezoneResolver::new(url.clone())
                .expect("Failed to build timezone resolver client"),
        ),
        None => Arc::new(FixedOffsetResolver(0)),
    };

    let ephemeris = HttpEphemeris::new(config.ephemeris_base_url.clone())
        .expect("Failed to build ephemeris client");

    let charts = Arc::new(ChartEngine::new(
        Arc::new(geocoder),
        timezones,
        Arc::new(ephemeris),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store: SessionStore::new(),
        gateway: Arc::new(gateway),
        oracle: Arc::new(oracle),
        charts,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
