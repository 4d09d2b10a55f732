// src/profile/handlers.rs

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::editor::{apply_bio_edit, apply_education_edit, apply_experience_edit, EditError};
use super::models::{BioEditRequest, EducationEditRequest, ExperienceEditRequest};
use super::store::{ProfileStore, SessionSlot, SqliteProfileStore};
use crate::common::{ApiError, AppState};
use crate::extraction::CandidateProfile;

impl From<EditError> for ApiError {
    fn from(e: EditError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

async fn store_for(state_lock: &Arc<RwLock<AppState>>) -> SqliteProfileStore {
    let state = state_lock.read().await;
    SqliteProfileStore::new(state.db.clone())
}

async fn load_profile(
    store: &SqliteProfileStore,
    slot: &str,
) -> Result<CandidateProfile, ApiError> {
    store
        .get(slot)
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile stored".to_string()))
}

/// GET /api/profile - Read the stored candidate profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
) -> Result<Json<CandidateProfile>, ApiError> {
    let store = store_for(&state_lock).await;
    let profile = load_profile(&store, &slot).await?;
    Ok(Json(profile))
}

/// PUT /api/profile - Replace the stored profile wholesale
pub async fn put_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
    Json(profile): Json<CandidateProfile>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let store = store_for(&state_lock).await;
    store.set(&slot, &profile).await?;

    info!(slot = %slot, "Profile stored");

    Ok(Json(profile))
}

/// DELETE /api/profile - Clear the slot (explicit user action)
pub async fn delete_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
) -> Result<StatusCode, ApiError> {
    let store = store_for(&state_lock).await;
    store.clear(&slot).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/profile/bio - Commit a bio-block draft
pub async fn update_bio(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
    Json(edit): Json<BioEditRequest>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let store = store_for(&state_lock).await;
    let profile = load_profile(&store, &slot).await?;

    let updated = apply_bio_edit(profile, edit);
    store.set(&slot, &updated).await?;

    info!(slot = %slot, "Bio block saved");

    Ok(Json(updated))
}

/// PUT /api/profile/experience/:index - Commit one experience entry draft
pub async fn update_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
    Path(index): Path<usize>,
    Json(edit): Json<ExperienceEditRequest>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let store = store_for(&state_lock).await;
    let profile = load_profile(&store, &slot).await?;

    let updated = apply_experience_edit(profile, index, edit).map_err(|e| {
        warn!(slot = %slot, index = index, "Experience edit rejected");
        ApiError::from(e)
    })?;
    store.set(&slot, &updated).await?;

    info!(slot = %slot, index = index, "Experience entry saved");

    Ok(Json(updated))
}

/// PUT /api/profile/education/:index - Commit one education entry draft
pub async fn update_education(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    SessionSlot(slot): SessionSlot,
    Path(index): Path<usize>,
    Json(edit): Json<EducationEditRequest>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let store = store_for(&state_lock).await;
    let profile = load_profile(&store, &slot).await?;

    let updated = apply_education_edit(profile, index, edit).map_err(|e| {
        warn!(slot = %slot, index = index, "Education edit rejected");
        ApiError::from(e)
    })?;
    store.set(&slot, &updated).await?;

    info!(slot = %slot, index = index, "Education entry saved");

    Ok(Json(updated))
}
