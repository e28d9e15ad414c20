//! Transient notifications shown to the user after an operation

use std::error::Error;
use std::fmt::{Display, Error as FmtError, Formatter};
use std::time::{Duration, Instant};

use crate::error::user_message;

/// The flavour of a notification, which drives how it is displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// The CSS class of the notification banner
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification-success",
            NotificationKind::Error => "notification-error",
            NotificationKind::Info => "notification-info",
        }
    }
}

/// A message that is visible for a limited amount of time
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    kind: NotificationKind,
    message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind { self.kind }
    pub fn message(&self) -> &str          { &self.message }

    /// Whether this notification should still be displayed at `instant`
    pub fn is_visible_at(&self, instant: Instant) -> bool {
        instant.saturating_duration_since(self.shown_at) < self.duration
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self.kind {
            NotificationKind::Success => write!(f, "✓ {}", self.message),
            NotificationKind::Error => write!(f, "✗ {}", self.message),
            NotificationKind::Info => write!(f, "ℹ {}", self.message),
        }
    }
}


/// See [`notification_channel`]
pub type NotificationSender = tokio::sync::watch::Sender<Option<Notification>>;
/// See [`notification_channel`]
pub type NotificationReceiver = tokio::sync::watch::Receiver<Option<Notification>>;

/// Create a channel, that can be used to be told about every notification a controller shows
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    tokio::sync::watch::channel(None)
}


/// The notification banner. It holds at most one notification at a time: showing a new one replaces the previous one.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
    channel: Option<NotificationSender>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_channel(channel: NotificationSender) -> Self {
        Self { current: None, channel: Some(channel) }
    }

    /// Show a notification, for the duration set in [`crate::config::NOTIFICATION_DURATION`]
    pub fn show<S: ToString>(&mut self, kind: NotificationKind, message: S) {
        let duration = crate::config::get(&crate::config::NOTIFICATION_DURATION);
        self.show_for(kind, message, duration);
    }

    pub fn show_for<S: ToString>(&mut self, kind: NotificationKind, message: S, duration: Duration) {
        let notification = Notification {
            kind,
            message: message.to_string(),
            shown_at: Instant::now(),
            duration,
        };
        match kind {
            NotificationKind::Error => log::warn!("Notification: {}", notification.message),
            _ => log::info!("Notification: {}", notification.message),
        }

        self.current = Some(notification.clone());
        if let Some(sender) = &self.channel {
            // Nobody listening anymore is not an error
            let _ = sender.send(Some(notification));
        }
    }

    pub fn success<S: ToString>(&mut self, message: S) {
        self.show(NotificationKind::Success, message);
    }
    pub fn info<S: ToString>(&mut self, message: S) {
        self.show(NotificationKind::Info, message);
    }
    pub fn error<S: ToString>(&mut self, message: S) {
        self.show(NotificationKind::Error, message);
    }

    /// Log a failed operation, and tell the user about it
    pub fn failure(&mut self, context: &str, err: &(dyn Error + 'static)) {
        log::warn!("{}: {}", context, err);
        self.error(user_message(err));
    }

    /// Hide the current notification, if any
    pub fn hide(&mut self) {
        if self.current.take().is_some() {
            if let Some(sender) = &self.channel {
                let _ = sender.send(None);
            }
        }
    }

    /// The notification that is currently visible, if any
    pub fn current(&self) -> Option<&Notification> {
        self.current_at(Instant::now())
    }

    /// The notification that is (or was, or will be) visible at a given instant
    pub fn current_at(&self, instant: Instant) -> Option<&Notification> {
        self.current.as_ref()
            .filter(|n| n.is_visible_at(instant))
    }

    /// The last notification that has been shown, even if it has expired since
    pub fn last(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_expire() {
        let mut notifier = Notifier::new();
        assert!(notifier.current().is_none());

        notifier.show_for(NotificationKind::Success, "saved", Duration::from_secs(3));
        let shown_at = Instant::now();
        assert_eq!(notifier.current().map(|n| n.message()), Some("saved"));
        assert!(notifier.current_at(shown_at + Duration::from_secs(10)).is_none());
        assert!(notifier.last().is_some());

        notifier.hide();
        assert!(notifier.last().is_none());
    }

    #[test]
    fn newer_notifications_replace_older_ones() {
        let (sender, receiver) = notification_channel();
        let mut notifier = Notifier::new_with_channel(sender);
        notifier.success("first");
        notifier.error("second");

        assert_eq!(notifier.current().map(|n| n.kind()), Some(NotificationKind::Error));
        let received = receiver.borrow().clone();
        assert_eq!(received.map(|n| n.message().to_string()), Some("second".to_string()));
    }

    #[test]
    fn failures_use_server_messages() {
        let mut notifier = Notifier::new();
        let err: Box<dyn Error> = crate::error::ApiError::not_found("Todo not found").into();
        notifier.failure("Unable to delete", err.as_ref());
        assert_eq!(notifier.last().map(|n| n.message()), Some("Todo not found"));
    }
}
