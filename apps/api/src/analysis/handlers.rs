//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::analyzer::analyze;
use crate::analysis::extract::{extract_documents, UploadedDocument};
use crate::analysis::roles::{default_role, RoleSkills, DEFAULT_ROLE, ROLE_SKILLS};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleSkills>,
    pub default_skills: &'static [&'static str],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze-text
///
/// Scores pasted resume text against the target role.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = analyze(
        &request.resume_text,
        &request.target_role,
        state.scorer.as_ref(),
    )
    .await?;

    Ok(Json(result))
}

/// POST /analyze-multiple
///
/// Multipart form: one or more `files` parts plus a `role` text part.
/// All documents are converted to text and concatenated before scoring.
pub async fn handle_analyze_multiple(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut documents = Vec::new();
    let mut role = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("files") => {
                let filename = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                debug!(
                    "Received file {:?} ({} bytes)",
                    filename.as_deref().unwrap_or("<unnamed>"),
                    bytes.len()
                );
                documents.push(UploadedDocument {
                    filename,
                    content_type,
                    bytes,
                });
            }
            Some("role") => {
                role = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    if documents.is_empty() {
        return Err(AppError::Validation(
            "at least one 'files' part is required".to_string(),
        ));
    }
    let role = role.ok_or_else(|| AppError::Validation("'role' field is required".to_string()))?;

    info!("Analyzing {} uploaded document(s)", documents.len());

    let combined_text = tokio::task::spawn_blocking(move || extract_documents(&documents))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("document extraction task failed: {e}")))?;

    let result = analyze(&combined_text, &role, state.scorer.as_ref()).await?;
    Ok(Json(result))
}

/// GET /roles
///
/// Lists the role table in resolution order, with the fallback skills reported separately.
pub async fn handle_list_roles() -> Json<RolesResponse> {
    let roles = ROLE_SKILLS
        .iter()
        .filter(|entry| entry.role != DEFAULT_ROLE)
        .copied()
        .collect();

    Json(RolesResponse {
        roles,
        default_skills: default_role().skills,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {e}"))
}
