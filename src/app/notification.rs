// ABOUTME: Short-lived status bar messages shown in place of the key summary
// Errors stay up longer than confirmations; the main loop drops them on tick

use crate::session::SessionError;
use std::time::{Duration, Instant};

const INFO_DURATION: Duration = Duration::from_secs(3);
const ERROR_DURATION: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: String, notification_type: NotificationType) -> Self {
        let duration = match notification_type {
            NotificationType::Info => INFO_DURATION,
            NotificationType::Error => ERROR_DURATION,
        };
        Self {
            message,
            notification_type,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn reset_done(checklist_name: &str) -> Self {
        Self::new(format!("{checklist_name} : all items unchecked"), NotificationType::Info)
    }

    /// Progress is still in memory, so the message says so.
    pub fn save_failed(err: &SessionError) -> Self {
        Self::new(
            format!("Progress not saved ({err}); it will be retried on the next change"),
            NotificationType::Error,
        )
    }

    pub fn is_error(&self) -> bool {
        self.notification_type == NotificationType::Error
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_save_failure_is_an_error_that_lingers() {
        let err = SessionError::Io {
            path: PathBuf::from("sessions/trip.ckl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let n = Notification::save_failed(&err);
        assert!(n.is_error());
        assert!(n.message.contains("sessions/trip.ckl"));
        assert_eq!(n.duration, ERROR_DURATION);
        assert!(!n.is_expired());
    }

    #[test]
    fn test_reset_notice_names_checklist() {
        let n = Notification::reset_done("full");
        assert!(!n.is_error());
        assert_eq!(n.message, "full : all items unchecked");
    }

    #[test]
    fn test_zero_duration_expires() {
        let mut n = Notification::reset_done("full");
        n.duration = Duration::ZERO;
        std::thread::sleep(Duration::from_millis(2));
        assert!(n.is_expired());
    }
}
