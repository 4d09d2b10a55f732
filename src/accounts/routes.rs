// src/accounts/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn accounts_routes() -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/submissions",
            get(handlers::list_submissions).post(handlers::create_submission),
        )
}
