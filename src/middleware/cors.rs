// CORS configuration
// A single browser origin (the upload UI) is allowed to call the API.

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin = allowed_origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}

pub fn apply_cors(router: Router, allowed_origin: &str) -> Router {
    router.layer(cors_layer(allowed_origin))
}
