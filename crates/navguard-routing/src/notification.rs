//! User-facing notifications raised during navigation
//!
//! Notifications are fire-and-forget. They never change the decision; the
//! host decides how to render them.

use navguard_core::NotificationConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A route's module is not licensed
    ModuleNotVerified,
    /// The integrity check failed; navigation is blocked
    IntegrityViolation,
}

/// Where the host should show the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Transient toast in the bottom-right corner
    BottomRight,
    /// Blocking modal dialog
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub placement: Placement,
    pub title: String,
    pub message: String,
    /// `false` for surfaces the user cannot close
    pub dismissable: bool,
}

impl Notification {
    pub fn module_not_verified(config: &NotificationConfig) -> Self {
        Self {
            kind: NotificationKind::ModuleNotVerified,
            placement: Placement::BottomRight,
            title: "Error".to_string(),
            message: config.module_not_verified_message.clone(),
            dismissable: true,
        }
    }

    pub fn integrity_violation(config: &NotificationConfig) -> Self {
        Self {
            kind: NotificationKind::IntegrityViolation,
            placement: Placement::Modal,
            title: "Error!".to_string(),
            message: config.integrity_message.clone(),
            dismissable: false,
        }
    }
}

/// Presentation surface for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::IntegrityViolation => tracing::error!(
                title = %notification.title,
                dismissable = notification.dismissable,
                "{}",
                notification.message
            ),
            NotificationKind::ModuleNotVerified => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.message
            ),
        }
    }
}
