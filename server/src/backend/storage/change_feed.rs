//! Broadcast change notifications for the donor table.

use chrono::Utc;
use log::debug;
use shared::{DonorChangeEvent, DonorChangeKind};
use tokio::sync::broadcast;

/// Fan-out notifier: every subscriber receives every event.
///
/// Events carry only the kind of change. A subscriber that falls more than
/// `capacity` events behind gets `RecvError::Lagged`, which it should treat the
/// same as a notification.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<DonorChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DonorChangeEvent> {
        self.sender.subscribe()
    }

    /// Announce a change; returns how many subscribers were notified.
    pub fn publish(&self, kind: DonorChangeKind) -> usize {
        let event = DonorChangeEvent {
            kind,
            occurred_at: Utc::now().to_rfc3339(),
        };
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No change feed subscribers for {:?}", kind);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_every_subscriber_sees_every_event() {
        let feed = ChangeFeed::new(8);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();

        assert_eq!(feed.publish(DonorChangeKind::Inserted), 2);

        assert_eq!(a.recv().await.unwrap().kind, DonorChangeKind::Inserted);
        assert_eq!(b.recv().await.unwrap().kind, DonorChangeKind::Inserted);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let feed = ChangeFeed::new(8);
        assert_eq!(feed.publish(DonorChangeKind::Cleared), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_observes_lag() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        for _ in 0..5 {
            feed.publish(DonorChangeKind::Inserted);
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(_))));
        // After the lag report the receiver resumes with the retained events
        assert!(rx.recv().await.is_ok());
    }
}
