use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api;
use crate::assembler::RoutePlanner;
use crate::config::ServerConfig;

pub async fn run(planner: Arc<RoutePlanner>, config: &ServerConfig) {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::router(planner, config.max_upload_bytes))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Web server running at http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
