//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::enhancement::{EnhancementRequest, EnhancementResult, RefinementRequest};
use crate::parsing::{parse_resume_bytes, ParseError, ParsedResume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub latex_code: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/enhance
///
/// Multipart form: `jd_text` (text) and `resume_file` (PDF or DOCX).
/// Parses the upload, then runs generation → compile-repair → suggestions.
pub async fn handle_enhance_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EnhancementResult>, AppError> {
    let mut jd_text: Option<String> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("jd_text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid jd_text field: {e}")))?;
                jd_text = Some(text);
            }
            Some("resume_file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume_file field: {e}")))?;
                upload = Some((file_name, data));
            }
            _ => {}
        }
    }

    let job_description = require_text(jd_text.unwrap_or_default(), "jd_text")?;
    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("resume_file is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("resume_file is empty".to_string()));
    }

    info!(file_name = %file_name, bytes = data.len(), "Received resume upload");
    let parsed = parse_upload(file_name, data).await?;

    let request = EnhancementRequest {
        resume_text: parsed.raw_text,
        job_description,
    };
    let result = state
        .pipeline
        .enhance_with_contact(&request, &parsed.contact)
        .await;

    Ok(Json(result))
}

/// POST /api/v1/resumes/enhance/text
///
/// JSON body `{resume_text, job_description}` for callers that already hold
/// the resume as plain text.
pub async fn handle_enhance_text(
    State(state): State<AppState>,
    Json(request): Json<EnhancementRequest>,
) -> Result<Json<EnhancementResult>, AppError> {
    let request = EnhancementRequest {
        resume_text: require_text(request.resume_text, "resume_text")?,
        job_description: require_text(request.job_description, "job_description")?,
    };

    Ok(Json(state.pipeline.enhance(&request).await))
}

/// POST /api/v1/resumes/refine
///
/// Applies feedback to the supplied document. A refinement the model could not
/// apply still answers 200 with `success: false` and the original source.
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefinementRequest>,
) -> Result<Json<EnhancementResult>, AppError> {
    if request.latex_code.trim().is_empty() {
        return Err(AppError::Validation("latex_code cannot be empty".to_string()));
    }
    if request.feedback.trim().is_empty() {
        return Err(AppError::Validation("feedback cannot be empty".to_string()));
    }

    Ok(Json(state.pipeline.refine(&request).await))
}

/// POST /api/v1/resumes/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    if request.latex_code.trim().is_empty() {
        return Err(AppError::Validation("latex_code cannot be empty".to_string()));
    }

    let suggestions = state
        .pipeline
        .suggest(&request.latex_code, &request.job_description)
        .await;

    Ok(Json(SuggestionResponse { suggestions }))
}

fn require_text(value: String, field: &str) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

/// PDF extraction is CPU-bound and may panic on hostile input, so it runs on
/// the blocking pool where a panic surfaces as a `JoinError`.
async fn parse_upload(file_name: String, data: Bytes) -> Result<ParsedResume, AppError> {
    let parsed = tokio::task::spawn_blocking(move || parse_resume_bytes(&file_name, &data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                warn!("Resume parser crashed: {e}");
                AppError::UnprocessableEntity("The resume file could not be read".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("resume parser task cancelled: {e}"))
            }
        })?;

    parsed.map_err(|e| match e {
        ParseError::UnsupportedFileType(_) => {
            AppError::Validation("Only PDF and DOCX resumes are supported".to_string())
        }
        other => AppError::UnprocessableEntity(other.to_string()),
    })
}
