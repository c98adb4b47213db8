//! User-facing notifications for the outcome of form submissions.

use std::sync::Mutex;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notifications are titled with the error code.
    pub fn error(err: &ApiError) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: err.code().to_string(),
            description: err.message(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in memory. Useful for tests and for front-ends
/// that render notifications after the fact.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}
