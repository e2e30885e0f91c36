use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod page;
pub mod render;
pub mod state;

pub use page::{FilterEdit, Fetch, Homepage, PageState};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route(handlers::HOME, get(handlers::home))
        .route(render::FILTERS_ACTION, post(handlers::update_filters))
        .route("/api/state", get(handlers::get_state))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/sources", get(handlers::list_sources))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Mounts the homepage (initial fetches run in the background) and serves
/// it until the server stops.
pub async fn serve(addr: SocketAddr, homepage: Homepage) -> nd_core::Result<()> {
    homepage.mount().spawn();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}{}", listener.local_addr()?, handlers::HOME);
    axum::serve(listener, create_app(AppState { homepage })).await?;
    Ok(())
}
