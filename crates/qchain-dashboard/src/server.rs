//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

// Embed the page at compile time
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Auth
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Wallet
        .route(
            "/wallet",
            get(api::wallet::get_wallet)
                .post(api::wallet::connect_wallet)
                .delete(api::wallet::disconnect_wallet),
        )
        // Jobs
        .route("/estimate", post(api::estimate::estimate_job))
        .route("/analyse", post(api::analyse::analyse))
        .route(
            "/jobs",
            get(api::jobs::list_jobs).post(api::jobs::submit_job),
        )
        .route("/chat", post(api::chat::chat))
        .route("/stats", get(api::stats::stats))
        // Network
        .route("/contract", get(api::contract::contract_info))
        .route("/network/tps", get(api::network::tps));

    let static_routes = Router::new()
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index));

    Router::new()
        .nest("/api", api_routes)
        .merge(static_routes)
        .fallback(serve_index)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
