use tokio::sync::broadcast;

use crate::models::FilterState;

const BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Published after every animated apply with the filters in effect.
    FiltersChanged { filters: FilterState },
    /// Another part of the page switched the visible tab.
    TabChanged { tab: usize },
}

/// Broadcast channel connecting the filter manager with the rest of the
/// page. Cloning yields another handle to the same bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FilterEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FilterEvent> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: FilterEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!("No subscribers for {:?}", event);
                0
            }
        }
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
    async fn event_bus_delivers_to_every_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        let delivered = bus.publish(FilterEvent::TabChanged { tab: 2 });
        assert_eq!(delivered, 2);

        assert_eq!(first.recv().await.unwrap(), FilterEvent::TabChanged { tab: 2 });
        assert_eq!(second.recv().await.unwrap(), FilterEvent::TabChanged { tab: 2 });
    }

    #[test]
    fn event_bus_publish_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        let delivered = bus.publish(FilterEvent::FiltersChanged {
            filters: FilterState::default(),
        });
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn event_bus_carries_filter_snapshot() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let mut filters = FilterState::default();
        filters.set("advanced", true);
        bus.publish(FilterEvent::FiltersChanged {
            filters: filters.clone(),
        });

        match rx.recv().await.unwrap() {
            FilterEvent::FiltersChanged { filters: received } => assert_eq!(received, filters),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
