//! Tests for accounts module
//!
//! These tests verify:
//! - Submission validation, in particular the draft-only description rule
//! - Phase wire names
//! - Idempotent users upsert keyed on the auth identity

#[cfg(test)]
mod tests {
    use super::super::handlers::upsert_user_record;
    use super::super::models::*;
    use super::super::routes::accounts_routes;
    use super::super::validators::*;
    use crate::common::{AppState, Validator};
    use crate::extraction::CandidateProfile;
    use axum::body::Body;
    use axum::extract::Extension;
    use axum::http::{Request, StatusCode};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    fn valid_submission() -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            link: "https://acme.example/jobs/42".to_string(),
            phase: Phase::Submitted,
            description: None,
            notes: None,
        }
    }

    // ========================================================================
    // Submission Validator Tests
    // ========================================================================

    #[test]
    fn test_valid_submission_passes() {
        let result = SubmissionValidator.validate(&valid_submission());
        assert!(result.is_valid);
    }

    #[test]
    fn test_missing_company_fails() {
        let mut req = valid_submission();
        req.company_name = "  ".to_string();
        let result = SubmissionValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "companyName"));
    }

    #[test]
    fn test_missing_job_title_fails() {
        let mut req = valid_submission();
        req.job_title = String::new();
        let result = SubmissionValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "jobTitle"));
    }

    #[test]
    fn test_malformed_link_fails() {
        let mut req = valid_submission();
        req.link = "not a url".to_string();
        let result = SubmissionValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "link"));
    }

    #[test]
    fn test_draft_without_description_fails() {
        let mut req = valid_submission();
        req.phase = Phase::Draft;
        req.description = None;
        let result = SubmissionValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "description"));
    }

    #[test]
    fn test_draft_with_description_passes() {
        let mut req = valid_submission();
        req.phase = Phase::Draft;
        req.description = Some("Build widgets".to_string());
        let result = SubmissionValidator.validate(&req);
        assert!(result.is_valid);
    }

    #[test]
    fn test_submitted_without_description_passes() {
        let mut req = valid_submission();
        req.phase = Phase::Submitted;
        req.description = None;
        let result = SubmissionValidator.validate(&req);
        assert!(result.is_valid);
    }

    // ========================================================================
    // Register Validator Tests
    // ========================================================================

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            profile: CandidateProfile::default(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let result = RegisterValidator.validate(&register_request("jane@x.com", "secret1"));
        assert!(result.is_valid);
    }

    #[test]
    fn test_bad_email_fails() {
        let result = RegisterValidator.validate(&register_request("not-an-email", "secret1"));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_short_password_fails() {
        let result = RegisterValidator.validate(&register_request("jane@x.com", "abc"));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "password"));
    }

    // ========================================================================
    // Login Validator Tests
    // ========================================================================

    #[test]
    fn test_valid_login_passes() {
        let req = LoginRequest {
            email: "jane@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(LoginValidator.validate(&req).is_valid);
    }

    #[test]
    fn test_login_with_empty_password_fails() {
        let req = LoginRequest {
            email: "jane@x.com".to_string(),
            password: String::new(),
        };
        let result = LoginValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn test_login_with_bad_email_fails() {
        let req = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        let result = LoginValidator.validate(&req);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));
    }

    // ========================================================================
    // Login Handler Tests
    // ========================================================================

    async fn test_app() -> axum::Router {
        let state = AppState {
            db: test_pool().await,
            jwt_secret: "test-secret".to_string(),
            extractor: None,
            storage: None,
            auth_gate: None,
        };
        accounts_routes().layer(Extension(Arc::new(RwLock::new(state))))
    }

    async fn post_login(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_login_without_auth_service_is_unavailable() {
        let app = test_app().await;

        let (status, body) =
            post_login(app, r#"{"email":"jane@x.com","password":"secret1"}"#).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_login_validation_runs_before_provider_call() {
        let app = test_app().await;

        // No auth service is configured, so passing validation would give
        // 503; the 400 proves the validator ran first
        let (status, body) = post_login(app, r#"{"email":"","password":"secret1"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    // ========================================================================
    // Phase Tests
    // ========================================================================

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(
            serde_json::to_string(&Phase::IntroCall).unwrap(),
            "\"intro_call\""
        );
        let parsed: Phase = serde_json::from_str("\"onsite\"").unwrap();
        assert_eq!(parsed, Phase::Onsite);
    }

    #[test]
    fn test_phase_rejects_unknown_value() {
        let parsed: Result<Phase, _> = serde_json::from_str("\"ghosted\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_phase_all_round_trips() {
        for phase in Phase::ALL {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
    }

    // ========================================================================
    // Upsert Tests
    // ========================================================================

    async fn test_pool() -> sqlx::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations");
        pool
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_same_row() {
        let pool = test_pool().await;

        let mut profile = CandidateProfile::default();
        profile.first_name = Some("Jane".to_string());

        let first = upsert_user_record(&pool, "auth-1", "jane@x.com", &profile)
            .await
            .unwrap();
        assert_eq!(first.first_name.as_deref(), Some("Jane"));

        // Registering again with the same identity refreshes the row
        profile.first_name = Some("Janet".to_string());
        let second = upsert_user_record(&pool, "auth-1", "janet@x.com", &profile)
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.first_name.as_deref(), Some("Janet"));
        assert_eq!(second.email, "janet@x.com");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_upsert_distinct_identities_get_distinct_rows() {
        let pool = test_pool().await;
        let profile = CandidateProfile::default();

        let a = upsert_user_record(&pool, "auth-a", "a@x.com", &profile)
            .await
            .unwrap();
        let b = upsert_user_record(&pool, "auth-b", "b@x.com", &profile)
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
    }
}
