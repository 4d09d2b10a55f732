// src/profile/routes.rs

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

pub fn profile_routes() -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile)
                .put(handlers::put_profile)
                .delete(handlers::delete_profile),
        )
        .route("/api/profile/bio", put(handlers::update_bio))
        .route(
            "/api/profile/experience/:index",
            put(handlers::update_experience),
        )
        .route(
            "/api/profile/education/:index",
            put(handlers::update_education),
        )
}
