use tokio::sync::broadcast;
use tracing::debug;

use slackr_types::events::ClientEvent;

/// Typed pub/sub shared by every feature of one client.
///
/// Publishing never blocks and never fails; events sent while nobody is
/// subscribed are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ClientEvent) {
        debug!("Event: {:?}", event);
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(ClientEvent::ChannelsChanged);
        assert!(matches!(rx.recv().await.unwrap(), ClientEvent::ChannelsChanged));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::new().publish(ClientEvent::SessionEnded);
    }
}
