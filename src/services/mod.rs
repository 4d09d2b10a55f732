// src/services/mod.rs
//
// External collaborators: the OpenRouter completion endpoint, S3 object
// storage for original PDFs, and the hosted auth service used for sign-up.

pub mod authgate;
pub mod openrouter;
pub mod storage;

// Re-export commonly used types for convenience
pub use authgate::{AuthGateError, AuthGateService};
pub use openrouter::OpenRouterService;
pub use storage::StorageService;
