use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::BroadcastEvent;

/// In-process event bus backed by `tokio::broadcast`. Batches publish
/// progress here; the API's SSE route and snapshot monitor subscribe.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<BroadcastEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish an event to all current subscribers. An event with no
    /// subscribers is simply dropped.
    pub fn publish(&self, event: BroadcastEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let batch_id = Uuid::new_v4();

        bus.publish(BroadcastEvent::Started { batch_id, total: 3 });

        match rx.recv().await.unwrap() {
            BroadcastEvent::Started { batch_id: got, total } => {
                assert_eq!(got, batch_id);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_see_every_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        let batch_id = Uuid::new_v4();
        bus.publish(BroadcastEvent::Completed {
            batch_id,
            successful: 2,
            failed: 0,
            cancelled: false,
        });

        assert!(matches!(rx1.recv().await.unwrap(), BroadcastEvent::Completed { .. }));
        assert!(matches!(rx2.recv().await.unwrap(), BroadcastEvent::Completed { .. }));
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(16);
        bus.publish(BroadcastEvent::Started {
            batch_id: Uuid::new_v4(),
            total: 1,
        });
    }
}
