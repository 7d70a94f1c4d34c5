pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{
    Result,
    config::Config,
    gateway::{CallbackVerifier, Forwarder, ReqwestTransport},
};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);

        Ok(Self {
            forwarder: Arc::new(Forwarder::new(config.webhook.clone(), transport)),
            verifier: Arc::new(CallbackVerifier::new(
                config.webhook.callback_secret.clone(),
            )),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/recommendations", post(handlers::recommend))
        .route("/api/routines/new", post(handlers::create_routine))
        .route("/api/routines/update", post(handlers::update_routine))
        .route("/webhooks/n8n", post(handlers::workflow_callback))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    if config.webhook.url.is_none() {
        warn!("N8N_WEBHOOK_URL is not set; forwarding routes will fail until it is configured");
    }
    if config.webhook.secret.is_empty() {
        warn!("N8N_WEBHOOK_SECRET is empty; outbound requests will not be signed");
    }
    if config.webhook.callback_secret.is_empty() {
        warn!("N8N_CALLBACK_SECRET is empty; callback signatures will not be verified");
    }

    let app = router(AppState::from_config(&config)?);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
