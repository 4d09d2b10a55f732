//! Tests for extraction module
//!
//! These tests verify:
//! - Requests without a `file` field fail before the outbound step
//! - A missing extraction credential is fatal before the outbound step

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Extension;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    use super::super::routes::extraction_routes;
    use crate::common::AppState;

    const BOUNDARY: &str = "test-boundary";

    fn pdf_upload_body(field_name: &str) -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"{f}\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4 fake content\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
            f = field_name
        )
    }

    /// Router with no extractor configured: any request that reaches the
    /// outbound step answers SERVER_MISCONFIGURED, so earlier rejections
    /// are distinguishable by status and code.
    async fn test_app() -> Router {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations");

        let state = AppState {
            db: pool,
            jwt_secret: "test-secret".to_string(),
            extractor: None,
            storage: None,
            auth_gate: None,
        };

        extraction_routes().layer(Extension(Arc::new(RwLock::new(state))))
    }

    async fn post_parse(app: Router, body: String) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/parse")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_file_field_fails_before_outbound_step() {
        let app = test_app().await;

        // A wrongly-named field must hit the 400, not the configuration 500
        // the unconfigured extractor would produce
        let (status, body) = post_parse(app, pdf_upload_body("avatar")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");
        assert_eq!(body["code"], "NO_FILE_PROVIDED");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_outbound_step() {
        let app = test_app().await;

        let (status, body) = post_parse(app, pdf_upload_body("file")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server configuration error");
        assert_eq!(body["code"], "SERVER_MISCONFIGURED");
    }
}
