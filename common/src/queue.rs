//! Bounded inbound event queue.
//!
//! Host callbacks push [`Event`]s here and the host's main loop drains them
//! into the coordinator, so every state change happens on one logical thread
//! in arrival order. The queue never allocates: when full, the newest event is
//! dropped and counted.

use heapless::Deque;

use crate::config::EVENT_QUEUE_CAPACITY;
use crate::lifecycle::Event;

/// FIFO of pending events.
#[derive(Debug)]
pub struct EventQueue {
    events: Deque<Event, EVENT_QUEUE_CAPACITY>,
    dropped: u32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            dropped: 0,
        }
    }

    /// Enqueue `event`. On overflow the event is handed back and counted.
    pub fn push(&mut self, event: Event) -> Result<(), Event> {
        self.events.push_back(event).map_err(|event| {
            self.dropped = self.dropped.wrapping_add(1);
            log::warn!("event queue full, dropped {event:?} ({} total)", self.dropped);
            event
        })
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Event> { self.events.pop_front() }

    #[inline]
    pub fn len(&self) -> usize { self.events.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    /// Events dropped because the queue was full.
    #[inline]
    pub const fn dropped(&self) -> u32 { self.dropped }
}

impl Default for EventQueue {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::TapKind;

    #[test]
    fn test_fifo_order() {
        let mut q = EventQueue::new();
        q.push(Event::Create).unwrap();
        q.push(Event::SurfaceChanged { width: 10, height: 10 }).unwrap();
        q.push(Event::TimeTick).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(Event::Create));
        assert_eq!(q.pop(), Some(Event::SurfaceChanged { width: 10, height: 10 }));
        assert_eq!(q.pop(), Some(Event::TimeTick));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let mut q = EventQueue::new();
        for _ in 0..EVENT_QUEUE_CAPACITY {
            q.push(Event::TimeTick).unwrap();
        }
        let rejected = q.push(Event::Tap(TapKind::TapComplete));
        assert_eq!(rejected, Err(Event::Tap(TapKind::TapComplete)));
        assert_eq!(q.dropped(), 1);
        assert_eq!(q.len(), EVENT_QUEUE_CAPACITY, "Queued events are kept");
        assert_eq!(q.pop(), Some(Event::TimeTick));
    }
}
