// src/extraction/mod.rs
//
// Extraction Gateway: converts one uploaded PDF into structured candidate
// data via the OpenRouter completion endpoint.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod sanitize;

#[cfg(test)]
mod tests;

pub use models::CandidateProfile;
pub use routes::extraction_routes;
