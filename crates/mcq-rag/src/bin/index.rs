//! Build the chat vector index from a directory of documents
//!
//! Run with: cargo run -p mcq-rag --bin mcq-rag-index -- ./docs

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mcq_rag::config::McqConfig;
use mcq_rag::generation::OllamaClient;
use mcq_rag::ingestion::{DocumentFormat, TextChunker, TextExtractor};
use mcq_rag::providers::{EmbeddingProvider, OllamaEmbedder};
use mcq_rag::retrieval::LocalVectorIndex;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "mcq-rag-index", version, about = "Embed pdf/txt documents into the chat index")]
struct Args {
    /// Directory scanned recursively for .pdf and .txt files
    dir: PathBuf,

    /// Index file to write (defaults to retrieval.index_path)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcq_rag=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = McqConfig::load()?;
    let output = args.output.unwrap_or_else(|| config.retrieval.index_path.clone());

    let files: Vec<PathBuf> = WalkDir::new(&args.dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| DocumentFormat::from_filename(name).is_ok())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No .pdf or .txt files found under {}", args.dir.display());
    }
    tracing::info!("Indexing {} files from {}", files.len(), args.dir.display());

    let client = Arc::new(OllamaClient::new(&config.llm)?);
    let embedder = OllamaEmbedder::from_client(client);
    let chunker = TextChunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap);
    let index = LocalVectorIndex::create(output.clone());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(name.clone());

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let text = match tokio::task::spawn_blocking({
            let name = name.clone();
            move || TextExtractor::extract(&name, &data)
        })
        .await?
        {
            Ok(text) => text,
            Err(e) => {
                progress.println(format!("Skipping {}: {}", name, e));
                progress.inc(1);
                continue;
            }
        };

        let chunks = chunker.chunk(&name, &text);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            index.insert(chunk.text, chunk.source, embedding)?;
        }
        progress.inc(1);
    }

    progress.finish_with_message("done");
    index.save()?;
    tracing::info!("Wrote {} chunks to {}", index.len(), output.display());

    Ok(())
}
