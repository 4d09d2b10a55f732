// src/profile/store.rs
//! Single-slot key-value holder for the candidate profile under review.
//!
//! Explicit get/set/clear interface so the SQLite-backed slot can be
//! swapped for another backend without touching the editor logic. One
//! slot per session key; a write replaces the whole value, last write
//! wins, no merge or conflict detection.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderName},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::common::ApiError;
use crate::extraction::CandidateProfile;

/// Requests without a session header share this slot.
pub const DEFAULT_SLOT: &str = "default";

static SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored profile is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => ApiError::DatabaseError(e),
            StoreError::Corrupt(e) => {
                ApiError::InternalServer(format!("stored profile unreadable: {}", e))
            }
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, slot: &str) -> Result<Option<CandidateProfile>, StoreError>;
    async fn set(&self, slot: &str, profile: &CandidateProfile) -> Result<(), StoreError>;
    async fn clear(&self, slot: &str) -> Result<(), StoreError>;
}

/// SQLite-backed profile slot storage.
#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get(&self, slot: &str) -> Result<Option<CandidateProfile>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT profile FROM profile_slots WHERE slot_key = ?")
                .bind(slot)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, slot: &str, profile: &CandidateProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;

        sqlx::query(
            r#"
            INSERT INTO profile_slots (slot_key, profile, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(slot_key) DO UPDATE SET
                profile = excluded.profile,
                updated_at = datetime('now')
            "#,
        )
        .bind(slot)
        .bind(&json)
        .execute(&self.pool)
        .await?;

        debug!(slot = %slot, "Profile slot written");

        Ok(())
    }

    async fn clear(&self, slot: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profile_slots WHERE slot_key = ?")
            .bind(slot)
            .execute(&self.pool)
            .await?;

        debug!(slot = %slot, "Profile slot cleared");

        Ok(())
    }
}

/// Session slot extractor: reads the X-Session-Id header, falling back to
/// the shared default slot. Single-tab, single-writer access is assumed.
#[derive(Debug, Clone)]
pub struct SessionSlot(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionSlot
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let slot = parts
            .headers
            .get(&SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SLOT)
            .to_string();

        Ok(SessionSlot(slot))
    }
}
