//! `EventQueue`: the discrete-event scheduler.
//!
//! Pending events live in a `BTreeMap<SimTime, VecDeque<_>>`: the map orders
//! instants, the deque keeps same-instant events in insertion order.  Two
//! decisions scheduled for the same microsecond therefore execute in the
//! order they were scheduled, every run.
//!
//! There is no cancellation.  Event payloads carry whatever state they
//! expect to find so a handler can recognise and skip stale events.

use std::collections::{BTreeMap, VecDeque};

use log::{trace, warn};

use pr_core::{SimClock, SimTime};

/// One pending action.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent<E> {
    pub time: SimTime,
    pub event: E,
    pub description: String,
}

/// Executes events popped by [`EventQueue::run`].
pub trait EventHandler<E> {
    /// Called with the clock already advanced to `event.time`.  The handler
    /// may schedule further events on `queue`.
    fn handle(&mut self, event: ScheduledEvent<E>, queue: &mut EventQueue<E>);
}

/// Time-ordered event collection plus the simulation clock.
pub struct EventQueue<E> {
    pending: BTreeMap<SimTime, VecDeque<ScheduledEvent<E>>>,
    /// Cached total for O(1) `len()`.
    total: usize,
    clock: SimClock,
    executed: u64,
}

impl<E> EventQueue<E> {
    pub fn new(stop_time: SimTime) -> Self {
        Self { pending: BTreeMap::new(), total: 0, clock: SimClock::new(stop_time), executed: 0 }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    #[inline]
    pub fn stop_time(&self) -> SimTime {
        self.clock.stop_time()
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Insert an event.  Does not move the clock.
    ///
    /// An instant earlier than `now` is moved up to `now`; the clock never
    /// runs backwards.
    pub fn schedule(&mut self, time: SimTime, event: E, description: impl Into<String>) {
        let description = description.into();
        let now = self.clock.now();
        let time = if self.clock.has_started() && time < now {
            warn!("event {description:?} scheduled in the past ({time} < {now}); running it now");
            now
        } else {
            time
        };
        self.push(ScheduledEvent { time, event, description });
    }

    /// Schedule `event` `delay` after now.
    #[inline]
    pub fn schedule_in(&mut self, delay: SimTime, event: E, description: impl Into<String>) {
        let at = self.clock.now() + delay;
        self.schedule(at, event, description);
    }

    fn push(&mut self, scheduled: ScheduledEvent<E>) {
        self.pending.entry(scheduled.time).or_default().push_back(scheduled);
        self.total += 1;
    }

    /// Remove the earliest event and advance the clock to its time.
    ///
    /// Returns `None` when the queue is empty or the earliest event is at or
    /// after the stop time; such events stay pending.
    pub fn pop_next(&mut self) -> Option<ScheduledEvent<E>> {
        let mut entry = self.pending.first_entry()?;
        let time = *entry.key();
        if time >= self.clock.stop_time() {
            self.clock.advance_to(self.clock.stop_time());
            return None;
        }
        let event = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        self.clock.advance_to(time);
        self.executed += 1;
        trace!("{time}: {}", event.description);
        Some(event)
    }

    /// Execute events in order until the queue is empty or the stop time is
    /// reached.  Returns the number of events executed by this call.
    pub fn run<H: EventHandler<E>>(&mut self, handler: &mut H) -> u64 {
        let before = self.executed;
        while let Some(event) = self.pop_next() {
            handler.handle(event, self);
        }
        self.executed - before
    }

    /// Time of the earliest pending event.
    pub fn next_time(&self) -> Option<SimTime> {
        self.pending.keys().next().copied()
    }

    /// Number of pending events.
    #[inline]
    pub fn len(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Total events executed so far.
    #[inline]
    pub fn executed(&self) -> u64 {
        self.executed
    }
}
