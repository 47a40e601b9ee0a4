use dashmap::DashMap;
use tokio::sync::watch;

/// Per-key snapshot fan-out. Every publish replaces the value wholesale;
/// subscribers that fall behind only ever see the latest state.
pub struct SnapshotHub<T> {
    channels: DashMap<String, watch::Sender<T>>,
}

impl<T: Clone> SnapshotHub<T> {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Stores `snapshot` as the latest value for `key` and wakes every
    /// subscriber. A channel nobody listens to anymore is dropped instead.
    pub fn publish(&self, key: &str, snapshot: T) {
        let Some(sender) = self.channels.get(key) else {
            return;
        };
        if sender.receiver_count() == 0 {
            drop(sender);
            self.channels.remove(key);
            return;
        }
        sender.send_replace(snapshot);
    }

    /// Attaches a subscription for `key`. `current` seeds the channel when
    /// nobody published to it yet; an existing channel keeps its latest
    /// value.
    pub fn subscribe(&self, key: &str, current: T) -> Subscription<T> {
        let sender = self
            .channels
            .entry(key.to_string())
            .or_insert_with(|| watch::Sender::new(current));
        Subscription {
            receiver: sender.subscribe(),
            pending_current: true,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Lazy stream of snapshots. Dropping it detaches from the hub.
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    pending_current: bool,
}

impl<T: Clone> Subscription<T> {
    /// The next snapshot: the current value on the first call, then one per
    /// published change. `None` once the publishing side is gone.
    pub async fn next(&mut self) -> Option<T> {
        if self.pending_current {
            self.pending_current = false;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_yields_current_value_first() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut subscription = hub.subscribe("m1", 1);
        assert_eq!(subscription.next().await, Some(1));
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut subscription = hub.subscribe("m1", 1);
        assert_eq!(subscription.next().await, Some(1));

        hub.publish("m1", 2);
        assert_eq!(subscription.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_only_latest_snapshot_is_delivered() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut subscription = hub.subscribe("m1", 1);
        assert_eq!(subscription.next().await, Some(1));

        hub.publish("m1", 2);
        hub.publish("m1", 3);
        assert_eq!(subscription.next().await, Some(3));
    }

    #[tokio::test]
    async fn test_keys_do_not_cross() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut first = hub.subscribe("m1", 1);
        let mut second = hub.subscribe("m2", 10);
        assert_eq!(first.next().await, Some(1));
        assert_eq!(second.next().await, Some(10));

        hub.publish("m2", 20);
        assert_eq!(second.next().await, Some(20));
    }

    #[tokio::test]
    async fn test_abandoned_channels_are_pruned() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let subscription = hub.subscribe("m1", 1);
        assert_eq!(hub.channel_count(), 1);

        drop(subscription);
        hub.publish("m1", 2);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_latest_published_value() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut first = hub.subscribe("m1", 1);
        assert_eq!(first.next().await, Some(1));
        hub.publish("m1", 5);

        let mut second = hub.subscribe("m1", 99);
        assert_eq!(second.next().await, Some(5));
    }
}
