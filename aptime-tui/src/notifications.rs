//! Notification system for the console.

use chrono::{DateTime, Duration, Utc};

/// How long a non-error notice stays in the footer.
pub const NOTICE_TTL_SECS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "SUCCESS",
        }
    }
}

/// Follow-up the footer offers alongside a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Reload,
    SignIn,
}

impl NotificationAction {
    pub fn hint(self) -> &'static str {
        match self {
            NotificationAction::Reload => "Ctrl-r to retry",
            NotificationAction::SignIn => "sign in to continue",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub action: Option<NotificationAction>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            action: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Errors stay until replaced; everything else fades after the TTL.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.level != NotificationLevel::Error
            && now - self.created_at > Duration::seconds(NOTICE_TTL_SECS)
    }

    pub fn display(&self) -> String {
        match self.action {
            Some(action) => format!("{}: {} ({})", self.level.label(), self.message, action.hint()),
            None => format!("{}: {}", self.level.label(), self.message),
        }
    }
}
