//! Retrieval-augmented chat endpoint

use axum::{extract::State, Form};
use serde::Deserialize;
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;

/// Chat form body
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub msg: String,
}

/// GET|POST /chat/get - Answer a question over the indexed documents
pub async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Result<String> {
    tracing::info!("Chat query: {}", form.msg);

    let start = Instant::now();
    let answer = state.answerer().answer(&form.msg).await?;

    tracing::info!(
        "{:.2}s time taken by {}: {}",
        start.elapsed().as_secs_f64(),
        state.answerer().name(),
        answer
    );

    Ok(answer)
}
