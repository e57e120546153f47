//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use unicreon_core::ActorPatch;

use super::types::{NoticeEvent, ResolutionEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Player-facing messages
    Notice,
    /// Attack, check and item results
    Resolution,
    /// Combat tracker changes
    Turn,
    /// Actor changes to write back to storage
    Sync,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Notice, Topic::Resolution, Topic::Turn, Topic::Sync];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Notice(NoticeEvent),
    Resolution(ResolutionEvent),
    Turn(TurnEvent),
    Sync(ActorPatch),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Notice(_) => Topic::Notice,
            Event::Resolution(_) => Topic::Resolution,
            Event::Turn(_) => Topic::Turn,
            Event::Sync(_) => Topic::Sync,
        }
    }
}

struct Channels {
    notice: broadcast::Sender<Event>,
    resolution: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    sync: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Notice => &self.notice,
            Topic::Resolution => &self.resolution,
            Topic::Turn => &self.turn,
            Topic::Sync => &self.sync,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Topics are fixed, so every channel exists from
/// construction on.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                notice: broadcast::channel(capacity).0,
                resolution: broadcast::channel(capacity).0,
                turn: broadcast::channel(capacity).0,
                sync: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
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
    use unicreon_core::Notice;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut notices = bus.subscribe(Topic::Notice);
        let mut turns = bus.subscribe(Topic::Turn);

        bus.publish(Event::Turn(TurnEvent::Ended));
        bus.publish(Event::Notice(NoticeEvent {
            actor: None,
            notice: Notice::info("Bonjour"),
        }));

        assert_eq!(turns.recv().await.unwrap(), Event::Turn(TurnEvent::Ended));
        match notices.recv().await.unwrap() {
            Event::Notice(event) => assert_eq!(event.notice.text, "Bonjour"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(turns.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(Event::Turn(TurnEvent::Ended));
        assert_eq!(bus.subscribe_multiple(&Topic::ALL).len(), 4);
    }
}
