mod config;
mod controllers;
mod models;
mod result;
mod scores;
mod sessions;

pub use crate::result::Result;

mod prelude {
    pub use crate::{config::Config, result::Result, AppState};
}

use std::sync::Arc;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, Router};
use scores::ScoreGateway;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MokaStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<config::Config>,
    scores: ScoreGateway,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guess_the_number=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    return run().await.map_err(|e| e.0);
}

async fn run() -> Result {
    let cfg = config::build();
    let address = cfg.bind_address()?;

    let state = AppState {
        scores: ScoreGateway::connect(&cfg),
        cfg: Arc::new(cfg),
    };

    let router = app(state, sessions::store::build());

    info!("Listening on {address}");

    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    return Ok(());
}

pub fn app(state: AppState, session_store: MokaStore) -> Router {
    let mut session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(state.cfg.server_protocol == "https")
        .with_same_site(SameSite::Lax);

    if state.cfg.server_domain != "localhost" {
        session_layer = session_layer.with_domain(state.cfg.server_domain.to_string());
    }

    let session_service = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_| async {
            return StatusCode::BAD_REQUEST;
        }))
        .layer(session_layer);

    let router = Router::new();

    // dynamic paths
    let router = controllers::add_routes(router);

    // static assets
    let router = router.nest_service("/assets", ServeDir::new("assets"));

    return router
        .with_state(state)
        .layer(session_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
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
}
