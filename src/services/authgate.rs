// src/services/authgate.rs
//! Client for the hosted auth service used at sign-up and sign-in.
//!
//! Account identities live in the external provider; this service only
//! creates and verifies them. Sessions are our own JWTs issued after the
//! provider accepts the credentials.

use reqwest::Client;
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::common::safe_email_log;

#[derive(Debug, Error)]
pub enum AuthGateError {
    #[error("auth service request failed: {0}")]
    RequestFailed(String),

    /// The provider rejected the sign-up; the message is surfaced verbatim
    /// to the user.
    #[error("{0}")]
    SignUpRejected(String),

    /// The provider rejected the credentials at sign-in.
    #[error("{0}")]
    CredentialsRejected(String),

    #[error("auth service returned no user id")]
    MissingIdentity,
}

#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    pub base_url: String,
    pub service_key: String,
}

impl AuthGateConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("AUTH_BASE_URL").ok().filter(|v| !v.is_empty())?;
        let service_key = env::var("AUTH_SERVICE_KEY").ok().filter(|v| !v.is_empty())?;
        Some(Self {
            base_url,
            service_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    user: Option<AuthUser>,
    // GoTrue-style error bodies use either of these keys depending on version
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug)]
pub struct AuthGateService {
    config: AuthGateConfig,
    client: Client,
}

impl AuthGateService {
    pub fn new(config: AuthGateConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Create an auth identity for email/password and return its id.
    ///
    /// There is no rollback path: a created identity whose users row insert
    /// later fails is reconciled by the idempotent upsert on retry, not
    /// deleted here.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<String, AuthGateError> {
        let url = format!(
            "{}/auth/v1/signup",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(email = %safe_email_log(email), "Creating auth identity");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.service_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error contacting auth service");
                AuthGateError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthGateError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let reason = body
                .msg
                .or(body.error_description)
                .unwrap_or_else(|| format!("sign-up failed with status {}", status));
            warn!(status = %status, reason = %reason, "Auth service rejected sign-up");
            return Err(AuthGateError::SignUpRejected(reason));
        }

        body.user
            .map(|u| u.id)
            .ok_or(AuthGateError::MissingIdentity)
    }

    /// Verify email/password via the provider's password grant and return
    /// the identity id for the session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthGateError> {
        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(email = %safe_email_log(email), "Verifying credentials");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.service_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error contacting auth service");
                AuthGateError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthGateError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let reason = body
                .msg
                .or(body.error_description)
                .unwrap_or_else(|| "Invalid login credentials".to_string());
            warn!(status = %status, email = %safe_email_log(email), "Auth service rejected sign-in");
            return Err(AuthGateError::CredentialsRejected(reason));
        }

        body.user
            .map(|u| u.id)
            .ok_or(AuthGateError::MissingIdentity)
    }
}
