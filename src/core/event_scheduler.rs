use super::event::Event;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default).
        // Equal times pop in insertion order.
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Pending future events ordered by time
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule an event at its absolute time
    pub fn insert(&mut self, event: Event) {
        let scheduled_event = ScheduledEvent {
            sequence_num: self.sequence_counter,
            event,
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
    }

    /// Remove and return the earliest event
    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.event_queue.pop().map(|scheduled| scheduled.event)
    }

    /// Time of the earliest event without removing it
    pub fn peek_time(&self) -> Option<f64> {
        self.event_queue.peek().map(|scheduled| scheduled.event.time)
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
