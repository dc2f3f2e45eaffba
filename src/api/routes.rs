use axum::{routing::post, Router};
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::handlers::*;
use crate::config::Config;

pub fn create_router(config: Config) -> Router {
    Router::new()
        .route("/api/gpx-to-pnezd", post(gpx_to_pnezd))
        .route("/api/pnezd-to-gpx", post(pnezd_to_gpx))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB limit
                .layer(CorsLayer::permissive())
        )
        .with_state(Arc::new(config))
}
