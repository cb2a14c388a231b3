//! Toast Notifications
//!
//! Notifications from the core are shown as a stack of toasts in the corner
//! of the screen. At most [`MAX_TOASTS`] are visible; the oldest goes first
//! when a new one arrives. Each toast expires on its own.

use std::time::{Duration, Instant};

use dex_core::{Notification, Severity};

/// Maximum toasts on screen at once
pub const MAX_TOASTS: usize = 5;

/// How long a toast of the given severity stays up
#[must_use]
pub fn toast_duration(severity: Severity) -> Duration {
    match severity {
        Severity::Error => Duration::from_secs(7),
        Severity::Warn => Duration::from_secs(5),
        Severity::Info | Severity::Success => Duration::from_secs(4),
    }
}

/// A single toast
#[derive(Clone, Debug)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// Stack of visible toasts, oldest first
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, dropping the oldest toast when full
    pub fn push(&mut self, notification: Notification, now: Instant) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.remove(0);
        }

        let expires_at = now + toast_duration(notification.severity);
        self.toasts.push(Toast {
            notification,
            expires_at,
        });
    }

    /// Drop every toast whose time is up
    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Dismiss the newest toast
    pub fn dismiss_latest(&mut self) {
        self.toasts.pop();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
