//! Notifications
//!
//! Transient banner messages. A notification stays visible for [`NOTIFICATION_TTL`] after
//! it is raised; a newer notification replaces it.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::{SignedDuration, Timestamp};
use mockall::automock;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: SignedDuration = SignedDuration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    message: String,
    severity: Severity,
    raised_at: Timestamp,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity, raised_at: Timestamp) -> Self {
        Self {
            message: message.into(),
            severity,
            raised_at,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn raised_at(&self) -> Timestamp {
        self.raised_at
    }

    /// The instant the banner is dismissed.
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.raised_at
            .checked_add(NOTIFICATION_TTL)
            .unwrap_or(Timestamp::MAX)
    }

    #[must_use]
    pub fn is_visible_at(&self, now: Timestamp) -> bool {
        now < self.expires_at()
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[automock]
/// Presents notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Notifier that only records through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity() {
            Severity::Success => tracing::info!("{}", notification.message()),
            Severity::Error => tracing::warn!("{}", notification.message()),
        }
    }
}
