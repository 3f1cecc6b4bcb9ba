//! API Routes
//!
//! - `/api/upload` - Document upload and field extraction
//! - `/api/health` - Health checks

pub mod health;
pub mod upload;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let allowed_origin = state.config.server.cors_allowed_origin.clone();

    let api_router = Router::new()
        .merge(upload::router(state.clone()))
        .merge(health::router(state));

    apply_cors(api_router, &allowed_origin).layer(TraceLayer::new_for_http())
}
