use super::types::QueueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    pub queue: QueueId,
}

impl Event {
    pub fn new(time: f64, kind: EventKind, queue: QueueId) -> Self {
        Self { time, kind, queue }
    }

    pub fn arrival(time: f64, queue: QueueId) -> Self {
        Self::new(time, EventKind::Arrival, queue)
    }

    pub fn departure(time: f64, queue: QueueId) -> Self {
        Self::new(time, EventKind::Departure, queue)
    }
}
