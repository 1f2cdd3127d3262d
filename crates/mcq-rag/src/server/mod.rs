//! HTTP server for MCQ generation and document chat

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};

use crate::config::McqConfig;
use crate::error::{Error, Result};
use state::AppState;

/// MCQ HTTP Server
pub struct McqServer {
    config: McqConfig,
    state: AppState,
}

impl McqServer {
    /// Create a new MCQ server
    pub async fn new(config: McqConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state.clone());

        tracing::info!("Starting MCQ server on http://{}", addr);
        tracing::info!("API info: http://{}/api/info", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(self.state))
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let static_dir = &config.server.static_dir;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        // Pages
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/chat", ServeFile::new(static_dir.join("chat.html")))
        .merge(routes::app_routes(config.server.max_upload_size))
        .nest("/api", routes::api_routes())
        .with_state(state.clone())
        // Middleware layers (order matters - applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if config.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    state.set_ready(false);
    tracing::info!("Shutting down MCQ server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatAnswerer, QuizGenerator};
    use crate::storage::McqStore;
    use crate::test_support::{quiz_json, write_schema, EchoAnswerer, StaticGenerator};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "mcq-test-boundary";

    fn test_state(generator: Value, dir: &tempfile::TempDir) -> AppState {
        let mut config = McqConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.upload_dir = dir.path().join("uploads");
        config.server.static_dir = dir.path().join("static");
        write_schema(dir.path());

        let generator: Arc<dyn QuizGenerator> = Arc::new(StaticGenerator::new(generator));
        let answerer: Arc<dyn ChatAnswerer> = Arc::new(EchoAnswerer);
        AppState::from_parts(config, McqStore::in_memory().unwrap(), generator, answerer)
    }

    fn multipart_body(file_name: &str, content: &str, fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
        ));
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn upload_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate_mcqs")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(json!({}), &dir));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_readiness_follows_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(json!({}), &dir);
        state.set_ready(false);

        let response = build_router(state)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_generate_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(json!({"quiz": quiz_json(3), "review": "moderate"}), &dir);
        let app = build_router(state.clone());

        let body = multipart_body(
            "sample.txt",
            "The sky is blue.",
            &[("num_mcqs", "3"), ("subject", "science"), ("complexity", "easy")],
        );
        let response = app.clone().oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(result["status_code"], 200);
        assert_eq!(result["review"], "moderate");
        assert_eq!(result["data"].as_object().unwrap().len(), 3);
        assert_eq!(state.store().count().unwrap(), 1);
        assert!(dir.path().join("uploads").join("sample.txt").exists());

        let id = result["mcq_id"].as_i64().unwrap();
        let response = app
            .oneshot(
                Request::get(format!("/download/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(&format!("mcqs_{}.csv", id)));

        let csv = body_text(response).await;
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().next().unwrap().starts_with("MCQ"));
    }

    #[tokio::test]
    async fn test_missing_quiz_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(json!({"review": "moderate"}), &dir);
        let app = build_router(state.clone());

        let body = multipart_body(
            "sample.txt",
            "The sky is blue.",
            &[("num_mcqs", "3"), ("subject", "science"), ("tone", "easy")],
        );
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(result["status_code"], 400);
        assert_eq!(result["message"], "Quiz wasn't generated!");
        assert!(result.get("mcq_id").is_none());
        assert_eq!(state.store().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bad_form_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(json!({}), &dir));

        let body = multipart_body(
            "sample.txt",
            "The sky is blue.",
            &[("num_mcqs", "zero"), ("subject", "science"), ("complexity", "easy")],
        );
        let response = app.clone().oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = multipart_body("sample.txt", "The sky is blue.", &[("num_mcqs", "2")]);
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(json!({}), &dir));

        let response = app
            .oneshot(Request::get("/download/9999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_form_post() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(json!({}), &dir));

        let response = app
            .oneshot(
                Request::post("/chat/get")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("msg=What+is+blue%3F"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "You asked: What is blue?");
    }

    #[tokio::test]
    async fn test_chat_query_string() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(json!({}), &dir));

        let response = app
            .oneshot(Request::get("/chat/get?msg=hello").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "You asked: hello");
    }

    #[tokio::test]
    async fn test_list_records() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(json!({}), &dir);
        let quiz = serde_json::from_str(&quiz_json(2)).unwrap();
        state.store().insert(&quiz, "easy").unwrap();

        let response = build_router(state)
            .oneshot(Request::get("/api/mcqs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listing: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(listing["total"], 1);
        assert_eq!(listing["records"][0]["question_count"], 2);
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(json!({}), &dir);
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/index.html"), "<h1>MCQ</h1>").unwrap();

        let response = build_router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>MCQ</h1>");
    }
}
