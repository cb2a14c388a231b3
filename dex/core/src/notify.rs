//! Notifications
//!
//! User-facing notices raised by the controller. Delivery is fire-and-forget:
//! a sink never blocks the caller and never reports failure back.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Summary and detail for an empty lookup
pub const EMPTY_QUERY_SUMMARY: &str = "Warn";
/// Detail shown when the user submits without typing anything
pub const EMPTY_QUERY_DETAIL: &str = "Write a Polémon ID or name";
/// Summary for a failed lookup
pub const LOOKUP_FAILED_SUMMARY: &str = "Error";
/// Detail shown when a lookup fails for any reason
pub const LOOKUP_FAILED_DETAIL: &str = "Pokémon name or ID is not valid";

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Info,
    /// Success
    Success,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl Severity {
    /// Short label for rendering
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// One notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub severity: Severity,
    /// Short title
    pub summary: String,
    /// Message body
    pub detail: String,
}

impl Notification {
    /// Create a notification
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Receiver of user-facing notifications
pub trait NotificationSink: Send {
    /// Deliver a notification
    fn notify(&self, severity: Severity, summary: &str, detail: &str);
}

/// Sink that forwards notifications over a channel to the surface
///
/// Uses `try_send`; if the surface is not draining fast enough or has gone
/// away the notification is dropped.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Notification>,
}

impl ChannelSink {
    /// Create a sink and the receiver the surface drains
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, severity: Severity, summary: &str, detail: &str) {
        if let Err(e) = self
            .tx
            .try_send(Notification::new(severity, summary, detail))
        {
            tracing::debug!(error = %e, "Dropped notification");
        }
    }
}
