//! Progress notifications relayed from resolvers to the host.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
}

/// Sending half of the host's notification channel.
///
/// A disabled notifier drops messages; so does one whose receiver is gone.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(NotificationKind::Info, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(NotificationKind::Warning, message.into());
    }

    fn send(&self, kind: NotificationKind, message: String) {
        tracing::debug!(?kind, %message, "notification");
        if let Some(tx) = &self.tx {
            let _ = tx.send(Notification { kind, message });
        }
    }
}
