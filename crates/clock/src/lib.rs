//! Timer source: a monotonic clock driven by the host, plus cancellable
//! one-shot delayed timers.
//!
//! # Invariants
//! - Time only moves forward, and only through `advance`.
//! - Timers fire one at a time in `(deadline, id)` order; a timer re-armed by
//!   a callback fires after that callback returns.
//! - Cancelled timers never fire.

mod queue;

pub use queue::{FiredTimer, TimerId, TimerQueue};
