use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use folio_common::WidgetId;

/// Handle to an armed one-shot timer. Ids increase monotonically per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// A timer that came due during `TimerQueue::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: WidgetId,
    pub deadline: Duration,
}

/// Monotonic clock plus the set of pending one-shot timers.
///
/// The queue never calls into widgets on its own. The host advances it and
/// routes each fired timer to its owner through the dispatch callback, which
/// gets the queue back so it can re-arm.
///
/// Uses BTreeMap keyed by `(deadline, id)` so timers with equal deadlines fire
/// in the order they were armed.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), WidgetId>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    /// Create a queue at time zero with no timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest deadline among armed timers.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of armed timers belonging to `owner`.
    pub fn pending_for(&self, owner: WidgetId) -> usize {
        self.pending.values().filter(|o| **o == owner).count()
    }

    /// Arm a one-shot timer that fires `delay` after the current clock reading.
    pub fn schedule(&mut self, owner: WidgetId, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.pending.insert((deadline, id), owner);
        self.deadlines.insert(id, deadline);
        tracing::trace!(id = id.0, %owner, ?deadline, "timer armed");
        id
    }

    /// Revoke a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(deadline) = self.deadlines.remove(&id) else {
            return false;
        };
        self.pending.remove(&(deadline, id));
        tracing::trace!(id = id.0, "timer cancelled");
        true
    }

    /// Revoke every pending timer owned by `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: WidgetId) -> usize {
        let doomed: Vec<(Duration, TimerId)> = self
            .pending
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.pending.remove(key);
            self.deadlines.remove(&key.1);
        }
        doomed.len()
    }

    /// Move the clock forward by `dt`, firing every timer that falls due.
    ///
    /// While a timer is being dispatched the clock reads its deadline, so a
    /// re-armed delay is measured from the moment the timer fired. Timers armed
    /// during dispatch that fall inside the window fire in the same call.
    /// A callback that keeps re-arming with a zero delay never lets this return.
    ///
    /// Returns the number of timers fired.
    pub fn advance<F>(&mut self, dt: Duration, mut dispatch: F) -> usize
    where
        F: FnMut(&mut Self, FiredTimer),
    {
        let target = self.now + dt;
        let mut fired = 0;
        while let Some((&(deadline, id), &owner)) = self.pending.first_key_value() {
            if deadline > target {
                break;
            }
            self.pending.remove(&(deadline, id));
            self.deadlines.remove(&id);
            self.now = self.now.max(deadline);
            fired += 1;
            dispatch(self, FiredTimer { id, owner, deadline });
        }
        self.now = target;
        fired
    }

    /// Move the clock forward to `instant`. Does nothing if it lies in the past.
    pub fn advance_to<F>(&mut self, instant: Duration, dispatch: F) -> usize
    where
        F: FnMut(&mut Self, FiredTimer),
    {
        let dt = instant.saturating_sub(self.now);
        self.advance(dt, dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn queue_starts_at_zero() {
        let q = TimerQueue::new();
        assert_eq!(q.now(), Duration::ZERO);
        assert_eq!(q.pending(), 0);
        assert!(q.next_deadline().is_none());
    }

    #[test]
    fn timer_fires_at_deadline_not_before() {
        let mut q = TimerQueue::new();
        let owner = WidgetId::new();
        let id = q.schedule(owner, ms(150));

        let fired = q.advance(ms(149), |_, _| panic!("fired early"));
        assert_eq!(fired, 0);
        assert!(q.is_pending(id));

        let mut seen = Vec::new();
        q.advance(ms(1), |_, t| seen.push(t));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, id);
        assert_eq!(seen[0].owner, owner);
        assert_eq!(seen[0].deadline, ms(150));
        assert_eq!(q.now(), ms(150));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(WidgetId::new(), ms(10));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert_eq!(q.advance(ms(100), |_, _| panic!("cancelled timer fired")), 0);
    }

    #[test]
    fn equal_deadlines_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        let owner = WidgetId::new();
        let a = q.schedule(owner, ms(5));
        let b = q.schedule(owner, ms(5));
        let c = q.schedule(owner, ms(1));

        let mut order = Vec::new();
        q.advance(ms(5), |_, t| order.push(t.id));
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn rearm_inside_dispatch_fires_within_window() {
        let mut q = TimerQueue::new();
        let owner = WidgetId::new();
        q.schedule(owner, ms(100));

        let mut deadlines = Vec::new();
        let fired = q.advance(ms(350), |q, t| {
            deadlines.push(t.deadline);
            assert_eq!(q.now(), t.deadline);
            q.schedule(t.owner, ms(100));
        });
        assert_eq!(fired, 3);
        assert_eq!(deadlines, vec![ms(100), ms(200), ms(300)]);
        assert_eq!(q.next_deadline(), Some(ms(400)));
        assert_eq!(q.now(), ms(350));
    }

    #[test]
    fn cancel_owner_only_touches_that_owner() {
        let mut q = TimerQueue::new();
        let a = WidgetId::new();
        let b = WidgetId::new();
        q.schedule(a, ms(1));
        q.schedule(a, ms(2));
        let keep = q.schedule(b, ms(3));

        assert_eq!(q.cancel_owner(a), 2);
        assert_eq!(q.pending_for(a), 0);
        assert!(q.is_pending(keep));

        let mut owners = Vec::new();
        q.advance(ms(10), |_, t| owners.push(t.owner));
        assert_eq!(owners, vec![b]);
    }

    #[test]
    fn advance_to_past_is_noop() {
        let mut q = TimerQueue::new();
        q.advance(ms(50), |_, _| {});
        assert_eq!(q.advance_to(ms(10), |_, _| {}), 0);
        assert_eq!(q.now(), ms(50));
    }
}
