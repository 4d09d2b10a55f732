// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Only drop tables if RESET_DB environment variable is set to "true"
    // This prevents data loss on server restarts
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    } else {
        info!("Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_user_tables(pool).await?;
    create_submission_tables(pool).await?;
    create_profile_slot_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS submissions")
        .execute(pool)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS users").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS profile_slots")
        .execute(pool)
        .await?;
    Ok(())
}

/// Users table: one row per account, keyed by the external auth identity.
/// The UNIQUE constraint on auth_id is what makes registration idempotent -
/// a retry after a partial failure upserts against the same identity instead
/// of inserting a duplicate row.
async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            auth_id TEXT NOT NULL UNIQUE,
            first_name TEXT,
            last_name TEXT,
            email TEXT NOT NULL,
            cv_file_path TEXT,
            profile_data TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_submission_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            company_name TEXT NOT NULL,
            job_title TEXT NOT NULL,
            link TEXT NOT NULL,
            phase TEXT NOT NULL CHECK (phase IN (
                'draft', 'submitted', 'intro_call', 'assessment',
                'interview', 'onsite', 'offered', 'rejected'
            )),
            description TEXT,
            notes TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Single-slot candidate profile storage, one JSON blob per session slot.
async fn create_profile_slot_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profile_slots (
            slot_key TEXT PRIMARY KEY,
            profile TEXT NOT NULL,
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_auth_id ON users(auth_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_submissions_user_id ON submissions(user_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_created_at ON submissions(created_at)",
    )
    .execute(pool)
    .await?;
    Ok(())
}
