// src/accounts/mod.rs
//
// Account/Submission Gateway: sign-up against the external auth service,
// one users row per identity, and tracked job submissions.

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use extractors::AuthSession;
pub use routes::accounts_routes;
