// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{AuthGateService, OpenRouterService, StorageService};

/// Application state containing database pool, services, and configuration
///
/// The extraction and storage services are optional: a missing OR_KEY or
/// missing AWS settings leaves them unset, and the affected handlers surface
/// a configuration error instead of failing at startup. Each service owns
/// its HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub extractor: Option<Arc<OpenRouterService>>,
    pub storage: Option<Arc<StorageService>>,
    pub auth_gate: Option<Arc<AuthGateService>>,
}
