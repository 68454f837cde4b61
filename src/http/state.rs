use crate::session::{SessionContext, SessionManager};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session lifecycle + pipeline orchestration
    pub manager: Arc<SessionManager>,
    /// Latest uploaded resume/job-description text; each new session takes
    /// an immutable snapshot at open
    pub context: Arc<RwLock<SessionContext>>,
}

impl AppState {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            manager,
            context: Arc::new(RwLock::new(SessionContext::default())),
        }
    }
}
