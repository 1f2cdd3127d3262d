//! MCQ generation, export and listing endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::export::export_record;
use crate::generation::GenerationRequest;
use crate::server::state::AppState;
use crate::types::{GenerationResult, McqListResponse};

/// Raw form fields of a generation upload
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    num_mcqs: Option<String>,
    subject: Option<String>,
    tone: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            Error::bad_request(format!("Failed to read multipart field: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    Error::bad_request(format!("Failed to read file: {}", e))
                })?;
                form.file = Some((filename, data));
                continue;
            }

            let value = field.text().await.map_err(|e| {
                Error::bad_request(format!("Failed to read field '{}': {}", name, e))
            })?;

            match name.as_str() {
                "num_mcqs" => form.num_mcqs = Some(value),
                "subject" => form.subject = Some(value),
                "complexity" | "tone" => form.tone = Some(value),
                other => tracing::debug!("Ignoring form field '{}'", other),
            }
        }

        Ok(form)
    }

    fn into_request(self) -> Result<GenerationRequest> {
        let (file_name, data) = self
            .file
            .ok_or_else(|| Error::bad_request("Missing form field 'file'"))?;

        let raw_count = self
            .num_mcqs
            .ok_or_else(|| Error::bad_request("Missing form field 'num_mcqs'"))?;
        let mcq_count: u32 = raw_count.trim().parse().map_err(|_| {
            Error::bad_request(format!("num_mcqs must be a positive integer, got '{}'", raw_count))
        })?;
        if mcq_count == 0 {
            return Err(Error::bad_request("num_mcqs must be greater than zero"));
        }

        Ok(GenerationRequest {
            file_name,
            data,
            mcq_count,
            subject: self
                .subject
                .ok_or_else(|| Error::bad_request("Missing form field 'subject'"))?,
            tone: self
                .tone
                .ok_or_else(|| Error::bad_request("Missing form field 'complexity'"))?,
        })
    }
}

/// POST /generate_mcqs - Upload a document and generate MCQs
pub async fn generate_mcqs(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerationResult>> {
    let request = UploadForm::read(multipart).await?.into_request()?;

    tracing::info!(
        "Generating {} MCQs from {} ({} bytes, subject: {}, tone: {})",
        request.mcq_count,
        request.file_name,
        request.data.len(),
        request.subject,
        request.tone
    );

    save_upload(&state, &request).await?;

    let mut result = state.pipeline().generate(&request).await;

    if result.is_success() {
        let store = state.store().clone();
        let data = result.data.clone();
        let review = result.review.clone();
        let id = tokio::task::spawn_blocking(move || store.insert(&data, &review))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;
        result.mcq_id = Some(id);
    }

    tracing::info!("Generation finished: {} ({})", result.status_code, result.message);
    Ok(Json(result))
}

/// Keep a copy of the upload under a sanitized name
async fn save_upload(state: &AppState, request: &GenerationRequest) -> Result<()> {
    let upload_dir = &state.config().storage.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;

    let path = upload_dir.join(secure_filename(&request.file_name));
    tokio::fs::write(&path, &request.data).await?;
    tracing::debug!("Saved upload to {}", path.display());
    Ok(())
}

/// Reduce a client-supplied file name to a safe single path component
fn secure_filename(filename: &str) -> String {
    let cleaned: String = filename
        .replace(['/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();
    if cleaned.is_empty() {
        format!("upload_{}", Uuid::new_v4())
    } else {
        cleaned
    }
}

/// GET /download/:mcq_id - Export a stored record as CSV
pub async fn download(
    State(state): State<AppState>,
    Path(mcq_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let store = state.store().clone();
    let export = tokio::task::spawn_blocking(move || export_record(&store, mcq_id))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    tracing::info!("Exported MCQ record {} as {}", mcq_id, export.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}

/// GET /api/mcqs - List stored records
pub async fn list_mcqs(State(state): State<AppState>) -> Result<Json<McqListResponse>> {
    let store = state.store().clone();
    let records = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;
    Ok(Json(McqListResponse {
        total: records.len(),
        records,
    }))
}
