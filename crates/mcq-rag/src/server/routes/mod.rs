//! Routes for the MCQ server

pub mod chat;
pub mod mcq;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build the generation, export and chat routes
pub fn app_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload with larger body limit
        .route(
            "/generate_mcqs",
            post(mcq::generate_mcqs).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/download/:mcq_id", get(mcq::download))
        .route("/chat/get", get(chat::chat).post(chat::chat))
}

/// Build the JSON API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/mcqs", get(mcq::list_mcqs))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "mcq-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "MCQ generation from uploaded documents with CSV export and document chat",
        "endpoints": {
            "POST /generate_mcqs": "Upload a pdf/txt file with num_mcqs, subject and complexity",
            "GET /download/:mcq_id": "Download a generated MCQ set as CSV",
            "GET|POST /chat/get": "Ask a question over the indexed documents (form field msg)",
            "GET /api/mcqs": "List stored MCQ sets",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        }
    }))
}
