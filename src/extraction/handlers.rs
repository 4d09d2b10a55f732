// src/extraction/handlers.rs

use axum::{
    extract::{Extension, Multipart},
    response::Json,
};
use base64::Engine;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::models::{CandidateProfile, ExtractionEnvelope};
use super::sanitize::strip_code_fences;
use crate::common::{ApiError, AppState};
use crate::services::openrouter::OpenRouterError;

/// POST /api/parse - Extract a candidate profile from an uploaded PDF
///
/// Accepts a multipart form with one `file` field. Size and MIME type are
/// the caller's responsibility to pre-validate. Each invocation is one
/// sequential chain: read upload, one outbound call, one parse, optional
/// one storage write, one response. No retries.
pub async fn parse_resume(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    mut multipart: Multipart,
) -> Result<Json<CandidateProfile>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut file_data: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart payload".to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
            file_data = Some(data);
            break;
        }
    }

    // No outbound call is made without an upload
    let file_data = file_data.ok_or(ApiError::NoFileProvided)?;

    // Missing credential is fatal before any outbound call is attempted
    let extractor = state
        .extractor
        .as_ref()
        .ok_or(ApiError::ServerMisconfigured)?;

    info!(file_size = file_data.len(), "Parsing uploaded resume");

    let base64_pdf = base64::engine::general_purpose::STANDARD.encode(&file_data);

    let content = extractor
        .extract_profile_text(&base64_pdf)
        .await
        .map_err(|e| match e {
            OpenRouterError::MissingApiKey => ApiError::ServerMisconfigured,
            OpenRouterError::EmptyResponse => ApiError::EmptyModelResponse,
            OpenRouterError::UpstreamStatus { status, body } => {
                ApiError::UpstreamFailure(format!("HTTP {}: {}", status, body))
            }
            OpenRouterError::RequestFailed(detail) => ApiError::UpstreamFailure(detail),
        })?;

    debug!(content_len = content.len(), "Received model response");

    let cleaned = strip_code_fences(&content);

    let envelope: ExtractionEnvelope = serde_json::from_str(&cleaned)
        .map_err(|_| ApiError::MalformedModelJson(content.clone()))?;

    if envelope.is_resume == Some(false) {
        info!(
            reason = envelope.validity_reason.as_deref().unwrap_or("none given"),
            "Document rejected as not a resume"
        );
        return Err(ApiError::NotAResume(envelope.validity_reason));
    }

    let mut profile = envelope.profile;

    // Best-effort archive of the original PDF; failure only omits filePath
    if let Some(storage) = &state.storage {
        match storage.upload_original_pdf(file_data).await {
            Ok(key) => profile.file_path = Some(key),
            Err(e) => {
                warn!(error = %e, "Failed to archive original PDF, returning profile without filePath");
            }
        }
    }

    info!(
        has_name = profile.first_name.is_some(),
        experience_count = profile.experiences.len(),
        education_count = profile.education.len(),
        "Resume parsed successfully"
    );

    Ok(Json(profile))
}
