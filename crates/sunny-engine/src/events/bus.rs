//! Publish/subscribe for gameplay state changes (health, score).
//!
//! Subscribers are arena handles rather than references, so a UI element
//! and the thing it watches never hold pointers to each other. Each
//! subscriber has an inbox that it drains on its own schedule.

use crate::api::types::EntityId;
use crate::core::arena::{Arena, Handle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HealthChanged,
    MaxHealthChanged,
    ScoreChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HealthChanged { entity: EntityId, current: i32, max: i32 },
    MaxHealthChanged { entity: EntityId, max: i32 },
    ScoreChanged { score: i32, high_score: i32 },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::HealthChanged { .. } => EventKind::HealthChanged,
            GameEvent::MaxHealthChanged { .. } => EventKind::MaxHealthChanged,
            GameEvent::ScoreChanged { .. } => EventKind::ScoreChanged,
        }
    }
}

#[derive(Debug)]
pub struct Subscriber {
    kinds: Vec<EventKind>,
    inbox: Vec<GameEvent>,
}

pub type SubscriberId = Handle<Subscriber>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Arena<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kinds: &[EventKind]) -> SubscriberId {
        self.subscribers.insert(Subscriber {
            kinds: kinds.to_vec(),
            inbox: Vec::new(),
        })
    }

    /// Returns false for unknown or already removed subscribers.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Deliver to every subscriber of the event's kind. Returns how many
    /// inboxes received it.
    pub fn publish(&mut self, event: GameEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for (_, sub) in self.subscribers.iter_mut() {
            if sub.kinds.contains(&kind) {
                sub.inbox.push(event.clone());
                delivered += 1;
            }
        }
        log::trace!("Published {:?} to {} subscribers", kind, delivered);
        delivered
    }

    /// Take everything queued for a subscriber, oldest first.
    pub fn drain(&mut self, id: SubscriberId) -> Vec<GameEvent> {
        match self.subscribers.get_mut(id) {
            Some(sub) => std::mem::take(&mut sub.inbox),
            None => {
                log::debug!("Drain from stale subscriber {:?}", id);
                Vec::new()
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(score: i32) -> GameEvent {
        GameEvent::ScoreChanged {
            score,
            high_score: score,
        }
    }

    #[test]
    fn publish_reaches_matching_subscribers_only() {
        let mut bus = EventBus::new();
        let hud = bus.subscribe(&[EventKind::ScoreChanged, EventKind::HealthChanged]);
        let hearts = bus.subscribe(&[EventKind::MaxHealthChanged]);

        assert_eq!(bus.publish(score(10)), 1);
        assert_eq!(bus.publish(score(20)), 1);
        assert_eq!(bus.drain(hud), vec![score(10), score(20)]);
        assert!(bus.drain(hud).is_empty());
        assert!(bus.drain(hearts).is_empty());
    }

    #[test]
    fn no_subscribers_is_a_no_op() {
        let mut bus = EventBus::new();
        assert_eq!(bus.publish(score(1)), 0);
    }

    #[test]
    fn unsubscribed_handle_goes_stale() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(&[EventKind::ScoreChanged]);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.publish(score(5)), 0);
        assert!(bus.drain(id).is_empty());

        // A new subscriber reusing the slot does not receive through the old handle
        let fresh = bus.subscribe(&[EventKind::ScoreChanged]);
        bus.publish(score(6));
        assert!(bus.drain(id).is_empty());
        assert_eq!(bus.drain(fresh), vec![score(6)]);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
