//! Notification hub: the dashboard's publish/subscribe channel.
//!
//! Each subscription owns its own crossbeam channel. Publishing fans a
//! [`Notification`] out to every live subscription whose [`TopicSet`]
//! contains it; the dashboard then drains each host's receiver on the same
//! thread before returning, so delivery is synchronous from the caller's
//! point of view.
//!
//! Unsubscribing drops the hub's sender. Anything still queued in the
//! receiver belongs to the subscription being torn down and is discarded
//! with it, so a notification can never outlive the widget it was meant for
//! nor leak into a replacement widget.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::id::SubscriberId;

/// Notifications published by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// New values were ingested (once per ingestion cycle)
    Updated,
    /// The active theme changed
    ThemeChanged,
    /// The shared axis visibility option changed
    AxisVisibilityChanged,
    /// Per-widget visibility changed on the dashboard side
    WidgetVisibilityChanged,
    /// The widget table was rebuilt; resolved indices may be stale
    WidgetTableChanged,
}

impl Notification {
    fn bit(self) -> u8 {
        match self {
            Notification::Updated => 1 << 0,
            Notification::ThemeChanged => 1 << 1,
            Notification::AxisVisibilityChanged => 1 << 2,
            Notification::WidgetVisibilityChanged => 1 << 3,
            Notification::WidgetTableChanged => 1 << 4,
        }
    }
}

/// Set of notifications a subscriber listens to
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TopicSet(u8);

impl TopicSet {
    pub const EMPTY: TopicSet = TopicSet(0);

    pub fn of(topics: &[Notification]) -> Self {
        topics.iter().fold(Self::EMPTY, |set, t| set.with(*t))
    }

    pub fn with(self, topic: Notification) -> Self {
        TopicSet(self.0 | topic.bit())
    }

    pub fn contains(&self, topic: Notification) -> bool {
        self.0 & topic.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Receiving end of one subscription
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    topics: TopicSet,
    rx: Receiver<Notification>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn topics(&self) -> TopicSet {
        self.topics
    }

    /// Next pending notification, if any
    pub fn try_next(&self) -> Option<Notification> {
        match self.rx.try_recv() {
            Ok(n) => Some(n),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

struct Subscriber {
    id: SubscriberId,
    topics: TopicSet,
    tx: Sender<Notification>,
}

/// Publish/subscribe hub owned by the dashboard context
#[derive(Default)]
pub struct NotificationHub {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    published: u64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for `topics`
    pub fn subscribe(&mut self, topics: TopicSet) -> Subscription {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;

        let (tx, rx) = unbounded();
        self.subscribers.push(Subscriber { id, topics, tx });
        tracing::trace!("{:?} subscribed to {:?}", id, topics);

        Subscription { id, topics, rx }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        let removed = self.subscribers.len() < before;
        if removed {
            tracing::trace!("{:?} unsubscribed", id);
        }
        removed
    }

    /// Fan a notification out to every interested subscriber.
    ///
    /// Returns the number of subscribers reached. Subscribers whose receiver
    /// was dropped without unsubscribing are pruned.
    pub fn publish(&mut self, notification: Notification) -> usize {
        self.published += 1;
        let mut reached = 0;
        self.subscribers.retain(|s| {
            if !s.topics.contains(notification) {
                return true;
            }
            match s.tx.send(notification) {
                Ok(()) => {
                    reached += 1;
                    true
                }
                Err(_) => {
                    tracing::debug!("Pruning disconnected {:?}", s.id);
                    false
                }
            }
        });
        reached
    }

    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Total notifications published since creation
    pub fn published_count(&self) -> u64 {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_set() {
        let set = TopicSet::of(&[Notification::Updated, Notification::ThemeChanged]);
        assert!(set.contains(Notification::Updated));
        assert!(set.contains(Notification::ThemeChanged));
        assert!(!set.contains(Notification::WidgetTableChanged));
        assert!(TopicSet::EMPTY.is_empty());
    }

    #[test]
    fn test_publish_respects_topics() {
        let mut hub = NotificationHub::new();
        let data = hub.subscribe(TopicSet::of(&[Notification::Updated]));
        let theme = hub.subscribe(TopicSet::of(&[Notification::ThemeChanged]));

        assert_eq!(hub.publish(Notification::Updated), 1);
        assert_eq!(data.try_next(), Some(Notification::Updated));
        assert_eq!(theme.try_next(), None);
    }

    #[test]
    fn test_unsubscribed_receives_nothing() {
        let mut hub = NotificationHub::new();
        let sub = hub.subscribe(TopicSet::of(&[Notification::Updated]));
        assert!(hub.unsubscribe(sub.id()));
        assert!(!hub.unsubscribe(sub.id()));

        assert_eq!(hub.publish(Notification::Updated), 0);
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut hub = NotificationHub::new();
        let a = hub.subscribe(TopicSet::EMPTY);
        hub.unsubscribe(a.id());
        let b = hub.subscribe(TopicSet::EMPTY);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let mut hub = NotificationHub::new();
        let sub = hub.subscribe(TopicSet::of(&[Notification::Updated]));
        drop(sub);
        assert_eq!(hub.publish(Notification::Updated), 0);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.published_count(), 1);
    }
}
