use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::session::SessionStore;
use crate::storage::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Active sessions, keyed by cookie token
    pub sessions: Arc<SessionStore>,
    /// Filesystem store for listing images
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: DatabaseConnection, uploads: UploadStore) -> Self {
        Self {
            db,
            sessions: Arc::new(SessionStore::new()),
            uploads,
        }
    }
}
