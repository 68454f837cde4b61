//! HTTP surface: the coaching WebSocket channel plus a small REST API
//!
//! - GET  /ws/audio     - bidirectional coaching channel (one session each)
//! - POST /api/context  - store resume/job-description text for new sessions
//! - GET  /             - service info
//! - GET  /health       - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
