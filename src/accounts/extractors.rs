//! Authentication extractor for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::Claims;
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated session extractor.
///
/// Validates the Bearer JWT and exposes the external auth identity. It
/// deliberately does NOT look up the users row: a valid session without a
/// profile row is a distinct failure ("User profile not found.") handled
/// by the submission handlers.
#[derive(Debug)]
pub struct AuthSession {
    pub auth_id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Extract Bearer token from Authorization header
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("Not authenticated".to_string()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = if let Some(rest) = token.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            token
        };

        let decoded = match decode::<Claims>(
            &bare_token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthorized("Not authenticated".to_string()));
            }
        };

        debug!(
            auth_id = %decoded.claims.sub,
            email = %safe_email_log(&decoded.claims.email),
            "Session validated"
        );

        Ok(AuthSession {
            auth_id: decoded.claims.sub,
            email: decoded.claims.email,
        })
    }
}
