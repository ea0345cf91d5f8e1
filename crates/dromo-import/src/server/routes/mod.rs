//! API routes for the import relay

pub mod imports;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Imports
        .route("/import-file", post(imports::start_import))
        .route("/import-status/:import_id", get(imports::get_import_status))
        .route("/imports", get(imports::list_imports))
        // Provider callbacks
        .route("/webhook", post(webhook::receive_webhook))
        // Info
        .route("/", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "dromo-import",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Dromo headless import relay",
        "endpoints": {
            "POST /import-file": "Start a headless import from an S3 object",
            "GET /import-status/:import_id": "Get the status of one import",
            "GET /imports": "List all imports",
            "POST /webhook": "Dromo import status callback",
            "GET /health": "Liveness check"
        }
    }))
}
