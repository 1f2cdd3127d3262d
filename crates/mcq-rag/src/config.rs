//! Configuration for the MCQ service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV: &str = "MCQ_RAG_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "mcq-rag.toml";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McqConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Database, uploads and data directory locations
    pub storage: StorageConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// MCQ generation pipeline configuration
    pub generation: GenerationConfig,
    /// Chat retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Log level and optional log file
    pub logging: LoggingConfig,
}

impl McqConfig {
    /// Load configuration from `$MCQ_RAG_CONFIG`, `./mcq-rag.toml`, or defaults,
    /// then apply environment overrides
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let path = explicit.or_else(|| {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("MCQ_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("MCQ_RAG_PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("UPLOAD_FOLDER") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = std::env::var("LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    /// Full path of the response schema file
    pub fn schema_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.generation.schema_file)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
    /// Directory holding index.html and chat.html
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 20 * 1024 * 1024,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database holding generated MCQs
    pub database_path: PathBuf,
    /// Folder uploaded documents are saved into
    pub upload_dir: PathBuf,
    /// Folder holding the response schema
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("mcqs.db"),
            upload_dir: PathBuf::from("uploads"),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for quiz generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Upper bound on generated tokens per call
    pub max_new_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "all-minilm".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.5,
            timeout_secs: 300,
            max_retries: 2,
            max_new_tokens: 1024,
        }
    }
}

/// MCQ generation pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Response schema file name inside `storage.data_dir`
    pub schema_file: String,
    /// Turn an unparseable quiz payload into a failure instead of empty data
    pub strict_quiz_parsing: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            schema_file: "response.json".to_string(),
            strict_quiz_parsing: false,
        }
    }
}

/// Retrieval configuration for the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// JSON file holding the vector index
    pub index_path: PathBuf,
    /// Number of chunks stuffed into the chat prompt
    pub top_k: usize,
    /// Chunk size in characters used by the index builder
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Temperature for chat answers
    pub chat_temperature: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("data/chat-index.json"),
            top_k: 2,
            chunk_size: 500,
            chunk_overlap: 20,
            chat_temperature: 0.8,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// Also write logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
