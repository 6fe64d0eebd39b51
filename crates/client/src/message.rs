//! Transient message banner.
//!
//! A message stays visible for [`MESSAGE_DURATION`] and is then cleared by a
//! detached timer task. Showing a new message does not cancel the timer of a
//! previous one, so an older timer can clear a newer message early.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How long a message stays visible.
pub const MESSAGE_DURATION: Duration = Duration::from_secs(5);

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// CSS class applied to the message container, next to `message-container`.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success-message",
            Self::Error => "error-message",
        }
    }
}

/// A message currently shown in the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// The banner: at most one visible message, observable through a `watch` channel.
#[derive(Clone)]
pub struct MessageBanner {
    sender: Arc<watch::Sender<Option<Message>>>,
    duration: Duration,
}

impl Default for MessageBanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBanner {
    /// Banner with the standard five-second display time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(MESSAGE_DURATION)
    }

    #[must_use]
    pub fn with_duration(duration: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            duration,
        }
    }

    /// Show a message and schedule it to be cleared.
    ///
    /// Must be called from within a tokio runtime for the auto-clear to be
    /// scheduled; outside one the message stays until replaced or cleared.
    pub fn show(&self, text: impl Into<String>, kind: MessageKind) {
        let message = Message {
            text: text.into(),
            kind,
        };
        tracing::debug!(kind = kind.as_str(), text = %message.text, "Showing message");
        self.sender.send_replace(Some(message));

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime, message will not auto-clear");
            return;
        };

        let sender = Arc::clone(&self.sender);
        let duration = self.duration;
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            sender.send_replace(None);
        });
    }

    /// The message currently visible, if any.
    #[must_use]
    pub fn current(&self) -> Option<Message> {
        self.sender.borrow().clone()
    }

    /// Clear the banner immediately.
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// Receive every change of the banner (new message or cleared).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Message>> {
        self.sender.subscribe()
    }
}
