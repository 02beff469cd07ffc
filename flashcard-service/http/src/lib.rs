use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use flashcard_configuration::ServerConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::{error_mapper, HttpError};
pub use extract::ValidatedJson;
pub use handlers::*;
pub use state::AppState;

pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/card-sets", post(create_card_set).get(list_card_sets))
        .route("/card-sets/", post(create_card_set).get(list_card_sets))
        .route(
            "/card-sets/{id}",
            get(get_card_set)
                .put(replace_card_set)
                .delete(delete_card_set),
        )
        .route("/label", post(label_image))
        .route("/upload", post(upload_file))
        .route("/read", post(read_text))
        .route("/transcribe", post(transcribe_audio))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn create_app_routes(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let router = build_router(state, config.body_limit_bytes);
    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(address = %address, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
