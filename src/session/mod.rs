// ABOUTME: Session module for checklist progress that survives restarts

pub mod persistence;

pub use persistence::{clear_sessions, ChecklistSession, LoadedChecklist, SessionError};
