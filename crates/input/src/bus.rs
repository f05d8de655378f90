use std::collections::BTreeMap;

use folio_common::WidgetId;

use crate::event::EventMask;

/// Revocable handle returned by `EventBus::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    owner: WidgetId,
}

impl Subscription {
    pub fn owner(&self) -> WidgetId {
        self.owner
    }
}

/// Registry of which widgets listen to which event kinds.
///
/// The bus does not hold callbacks. The page shell asks it who is subscribed
/// to an event kind and delivers the event to those widgets itself, so a
/// revoked subscription can never leave a dangling closure behind.
///
/// BTreeMap keyed by subscription id keeps delivery in subscription order.
#[derive(Debug, Default)]
pub struct EventBus {
    next_id: u64,
    entries: BTreeMap<u64, (WidgetId, EventMask)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `owner` to every event kind in `mask`.
    pub fn subscribe(&mut self, owner: WidgetId, mask: EventMask) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, (owner, mask));
        tracing::trace!(id, %owner, ?mask, "subscribed");
        Subscription { id, owner }
    }

    /// Revoke one subscription. Returns false if it was already revoked.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.entries.remove(&subscription.id).is_some()
    }

    /// Revoke every subscription held by `owner`. Returns how many were removed.
    pub fn unsubscribe_owner(&mut self, owner: WidgetId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (o, _)| *o != owner);
        before - self.entries.len()
    }

    /// Widgets subscribed to `kind`, in subscription order, each listed once.
    pub fn subscribers(&self, kind: EventMask) -> Vec<WidgetId> {
        let mut owners: Vec<WidgetId> = Vec::new();
        for (owner, mask) in self.entries.values() {
            if mask.intersects(kind) && !owners.contains(owner) {
                owners.push(*owner);
            }
        }
        owners
    }

    pub fn subscription_count(&self, owner: WidgetId) -> usize {
        self.entries.values().filter(|(o, _)| *o == owner).count()
    }

    /// Total live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_filtered_by_kind() {
        let mut bus = EventBus::new();
        let cursor = WidgetId::new();
        let bar = WidgetId::new();
        bus.subscribe(cursor, EventMask::POINTER_MOVE);
        bus.subscribe(bar, EventMask::SCROLL | EventMask::RESIZE);

        assert_eq!(bus.subscribers(EventMask::POINTER_MOVE), vec![cursor]);
        assert_eq!(bus.subscribers(EventMask::RESIZE), vec![bar]);
        assert!(bus.subscribers(EventMask::POINTER_LEAVE).is_empty());
    }

    #[test]
    fn subscribers_keep_order_and_dedupe() {
        let mut bus = EventBus::new();
        let a = WidgetId::new();
        let b = WidgetId::new();
        bus.subscribe(a, EventMask::POINTER_MOVE);
        bus.subscribe(b, EventMask::POINTER_MOVE);
        bus.subscribe(a, EventMask::POINTER);
        assert_eq!(bus.subscribers(EventMask::POINTER_MOVE), vec![a, b]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(WidgetId::new(), EventMask::SCROLL);
        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        assert!(bus.is_empty());
    }

    #[test]
    fn unsubscribe_owner_revokes_all_of_them() {
        let mut bus = EventBus::new();
        let tilt = WidgetId::new();
        let other = WidgetId::new();
        bus.subscribe(tilt, EventMask::POINTER_MOVE);
        bus.subscribe(tilt, EventMask::POINTER_LEAVE);
        bus.subscribe(other, EventMask::SCROLL);

        assert_eq!(bus.subscription_count(tilt), 2);
        assert_eq!(bus.unsubscribe_owner(tilt), 2);
        assert_eq!(bus.subscription_count(tilt), 0);
        assert_eq!(bus.len(), 1);
    }
}
