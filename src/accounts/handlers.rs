// src/accounts/handlers.rs

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthSession;
use super::models::*;
use super::validators::{LoginValidator, RegisterValidator, SubmissionValidator};
use crate::common::{
    generate_submission_id, generate_user_id, safe_email_log, ApiError, AppState, Validator,
};
use crate::extraction::CandidateProfile;
use crate::services::AuthGateError;

/// Insert or refresh the users row for an auth identity.
///
/// Keyed on `auth_id`: registering twice with the same identity (for
/// example after a failed first attempt left an orphaned identity) updates
/// the existing row instead of failing, so the whole flow is safe to retry.
pub(crate) async fn upsert_user_record(
    db: &SqlitePool,
    auth_id: &str,
    email: &str,
    profile: &CandidateProfile,
) -> Result<UserRecord, ApiError> {
    let profile_json = serde_json::to_string(profile)
        .map_err(|e| ApiError::InternalServer(format!("Failed to serialize profile: {}", e)))?;

    let user_id = generate_user_id();

    sqlx::query(
        r#"
        INSERT INTO users (id, auth_id, first_name, last_name, email, cv_file_path, profile_data)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(auth_id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            email = excluded.email,
            cv_file_path = excluded.cv_file_path,
            profile_data = excluded.profile_data
        "#,
    )
    .bind(&user_id)
    .bind(auth_id)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(email)
    .bind(&profile.file_path)
    .bind(&profile_json)
    .execute(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE auth_id = ?")
        .bind(auth_id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(user)
}

fn issue_session_token(jwt_secret: &str, auth_id: &str, email: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: auth_id.to_string(),
        email: email.to_string(),
        exp: (Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        ApiError::InternalServer("Failed to create session".to_string())
    })
}

/// POST /api/register
///
/// Creates an auth identity with the external provider, then the users row
/// carrying the reviewed profile, then issues a session token.
pub async fn register(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let validation = RegisterValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let app_state = state.read().await.clone();

    let auth_gate = app_state.auth_gate.as_ref().ok_or_else(|| {
        error!("AUTH_BASE_URL/AUTH_SERVICE_KEY not configured, cannot register");
        ApiError::ServiceUnavailable("Registration is not available".to_string())
    })?;

    info!(email = %safe_email_log(&payload.email), "Registering new account");

    let auth_id = auth_gate
        .sign_up(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            AuthGateError::SignUpRejected(reason) => ApiError::BadRequest(reason),
            other => {
                error!(error = %other, "Auth identity creation failed");
                ApiError::ServiceUnavailable("Registration is not available".to_string())
            }
        })?;

    let user = upsert_user_record(&app_state.db, &auth_id, &payload.email, &payload.profile).await?;

    let token = issue_session_token(&app_state.jwt_secret, &auth_id, &payload.email)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&payload.email),
        "Account registered"
    );

    Ok(Json(json!({
        "token": token,
        "user": user,
    })))
}

/// POST /api/login
///
/// Verifies credentials with the external provider and issues a fresh
/// session token. `user` is null when the identity has no profile row yet;
/// submission endpoints then answer 404 until one is registered.
pub async fn login(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let validation = LoginValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let app_state = state.read().await.clone();

    let auth_gate = app_state.auth_gate.as_ref().ok_or_else(|| {
        error!("AUTH_BASE_URL/AUTH_SERVICE_KEY not configured, cannot log in");
        ApiError::ServiceUnavailable("Login is not available".to_string())
    })?;

    let auth_id = auth_gate
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            AuthGateError::CredentialsRejected(reason) => ApiError::Unauthorized(reason),
            other => {
                error!(error = %other, "Credential verification failed");
                ApiError::ServiceUnavailable("Login is not available".to_string())
            }
        })?;

    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE auth_id = ?")
        .bind(&auth_id)
        .fetch_optional(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = issue_session_token(&app_state.jwt_secret, &auth_id, &payload.email)?;

    info!(email = %safe_email_log(&payload.email), "Login succeeded");

    Ok(Json(json!({
        "token": token,
        "user": user,
    })))
}

/// POST /api/submissions
pub async fn create_submission(
    session: AuthSession,
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    // Validate before touching the database
    let validation = SubmissionValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let app_state = state.read().await.clone();

    // Resolve the users row; a valid session without one is a distinct error
    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE auth_id = ?")
        .bind(&session.auth_id)
        .fetch_optional(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| {
            warn!(auth_id = %session.auth_id, "Submission for session without profile row");
            ApiError::NotFound("User profile not found.".to_string())
        })?;

    let submission_id = generate_submission_id();

    sqlx::query(
        r#"
        INSERT INTO submissions (id, user_id, company_name, job_title, link, phase, description, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&submission_id)
    .bind(&user.id)
    .bind(&payload.company_name)
    .bind(&payload.job_title)
    .bind(&payload.link)
    .bind(payload.phase.as_str())
    .bind(&payload.description)
    .bind(&payload.notes)
    .execute(&app_state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let submission = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = ?")
        .bind(&submission_id)
        .fetch_one(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        submission_id = %submission.id,
        user_id = %user.id,
        company = %submission.company_name,
        phase = %submission.phase,
        "Submission recorded"
    );

    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/submissions
pub async fn list_submissions(
    session: AuthSession,
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let app_state = state.read().await.clone();

    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE auth_id = ?")
        .bind(&session.auth_id)
        .fetch_optional(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("User profile not found.".to_string()))?;

    let submissions = sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&app_state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(submissions))
}
