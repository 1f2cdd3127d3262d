//! MCQ server binary
//!
//! Run with: cargo run -p mcq-rag --bin mcq-rag-server

use mcq_rag::config::McqConfig;
use mcq_rag::providers::{LlmProvider, OllamaLlm};
use mcq_rag::server::McqServer;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &McqConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("mcq_rag={},tower_http=info", config.logging.level).into());

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so the log level applies
    let config = McqConfig::load()?;
    init_tracing(&config)?;

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                       MCQ RAG Server                      ║
║        Quiz Generation, CSV Export and Document Chat      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Database: {}", config.storage.database_path.display());
    tracing::info!("  - Response schema: {}", config.schema_path().display());
    tracing::info!("  - Chat index: {}", config.retrieval.index_path.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let llm = OllamaLlm::new(&config.llm)?;
    if llm.health_check().await? {
        tracing::info!("Ollama is running (model: {})", llm.model());
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    let server = McqServer::new(config).await?;

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Chat: http://{}/chat", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /generate_mcqs      - Upload a document and generate MCQs");
    println!("  GET  /download/:mcq_id   - Download MCQs as CSV");
    println!("  POST /chat/get           - Ask a question over indexed documents");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
