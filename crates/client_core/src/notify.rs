use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

/// How long a notice stays up before it dismisses itself.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Posted(Notice),
    Dismissed(Uuid),
}

/// Transient notification channel. Every posted notice auto-dismisses
/// after a fixed interval, independent of whatever operation produced it;
/// a notice can also be dismissed early by hand.
#[derive(Clone)]
pub struct Notifier {
    events: broadcast::Sender<NoticeEvent>,
    ttl: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self { events, ttl }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.events.subscribe()
    }

    /// Publishes a notice and schedules its dismissal. Must be called from
    /// within a tokio runtime.
    pub fn notice(&self, text: impl Into<String>) -> Notice {
        let notice = Notice {
            id: Uuid::new_v4(),
            text: text.into(),
        };
        let _ = self.events.send(NoticeEvent::Posted(notice.clone()));

        let events = self.events.clone();
        let ttl = self.ttl;
        let id = notice.id;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = events.send(NoticeEvent::Dismissed(id));
        });

        notice
    }

    pub fn dismiss(&self, id: Uuid) {
        let _ = self.events.send(NoticeEvent::Dismissed(id));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
