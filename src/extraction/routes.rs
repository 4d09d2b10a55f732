// src/extraction/routes.rs

use axum::{routing::post, Router};

use super::handlers;

pub fn extraction_routes() -> Router {
    Router::new().route("/api/parse", post(handlers::parse_resume))
}
