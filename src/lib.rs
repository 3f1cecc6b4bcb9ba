// Taxdoc Extractor - pull tax form fields out of uploaded documents with an LLM

pub mod config;
pub mod extraction;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
