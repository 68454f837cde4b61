//! Session lifecycle and per-session pipeline orchestration
//!
//! This module provides:
//! - `Session`: the full state behind one open channel (ingest buffer,
//!   chunk queue, history, event sender, runner task)
//! - `SessionManager`: maps channel messages to pipeline calls and owns
//!   session open/close
//! - the pipeline runner: a single consumer per session, so at most one
//!   chunk is in flight and client-visible events keep chunk order

mod config;
mod manager;
mod pipeline;
mod session;

pub use config::SessionConfig;
pub use manager::SessionManager;
pub use session::{Session, SessionContext, SessionState, SessionStats};
