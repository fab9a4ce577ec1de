pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{Result, config::Config, generation::Generator};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/generate",
            post(handlers::generate).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let generator = Generator::new(config.inference.clone(), &config.cleanup)?;

    match config.server.mode_fallback {
        Some(mode) => info!("Requests without a valid mode fall back to {} mode", mode),
        None => info!("Requests without a valid mode are rejected"),
    }

    let app_state = AppState {
        generator: Arc::new(generator),
        mode_fallback: config.server.mode_fallback,
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
