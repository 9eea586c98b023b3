//! Synchronous single-threaded publish/subscribe event bus.
//!
//! The sweep algorithms broadcast a fixed sequence of `SweepEvent`s to every
//! subscriber in subscription order; delivery is in-process FIFO, not
//! multi-threaded fan-out. `ObserverState` tracks where a subscriber sits in
//! its own lifecycle, mirroring the original system's Observer pattern
//! (Created -> Subscribed -> Receiving -> Done) but dispatched with an
//! exhaustive `match` on `SweepEvent` rather than dynamic `on_<kind>` method
//! lookup -- there is no reflection-based dispatch in Rust, and a match arm
//! per variant is the idiomatic replacement.

use crate::region::Region;

/// Where a subscriber sits in its own lifecycle relative to a running sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Created,
    Subscribed,
    Receiving,
    Done,
}

/// The fixed vocabulary of events a sweep broadcasts.
///
/// `Intersect` carries a tentative pairwise overlap discovered along one
/// dimension; `Finalize` carries the same pair once every dimension has
/// confirmed the overlap (see `RegionSweep`'s cross-dimensional
/// confirmation in `sweep.rs`).
#[derive(Debug, Clone)]
pub enum SweepEvent {
    Init,
    Begin(Region),
    End(Region),
    Intersect(Region, Region),
    Finalize(Region, Region),
    Done,
}

/// A sink that receives a sweep's broadcast events in order.
pub trait Subscriber {
    fn on_event(&mut self, event: &SweepEvent);

    fn state(&self) -> ObserverState;
}

/// Dispatches a fixed event sequence to a list of subscribers, synchronously
/// and in subscription order. Does not retain events once delivered.
pub struct Publisher<'a> {
    subscribers: Vec<&'a mut dyn Subscriber>,
}

impl<'a> Publisher<'a> {
    pub fn new() -> Self {
        Self { subscribers: Vec::new() }
    }

    pub fn subscribe(&mut self, subscriber: &'a mut dyn Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub fn publish(&mut self, event: SweepEvent) {
        for sub in self.subscribers.iter_mut() {
            sub.on_event(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<'a> Default for Publisher<'a> {
    fn default() -> Self {
        Self::new()
    }
}
