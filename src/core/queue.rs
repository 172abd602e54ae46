use super::config::QueueConfig;
use super::types::{Admission, Capacity, QueueId};

/// One finite-capacity, multi-server waiting line.
///
/// Tracks server occupancy, loss and departure counters, and how long the
/// queue spent with each population. Unbounded queues keep a fixed number
/// of buckets; populations past the last bucket are accounted in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
    id: QueueId,
    capacity: Capacity,
    servers: usize,
    service_min: f64,
    service_max: f64,
    in_service: usize,
    waiting: usize,
    arrival_count: u64,
    loss_count: u64,
    departure_count: u64,
    time_in_state: Vec<f64>,
}

impl Queue {
    /// `unbounded_state_limit` is the bucket count used when capacity is unbounded
    pub fn new(id: QueueId, config: &QueueConfig, unbounded_state_limit: usize) -> Self {
        let capacity = Capacity::from_config(config.capacity);
        let buckets = match capacity {
            Capacity::Finite(limit) => limit + 1,
            Capacity::Unbounded => unbounded_state_limit,
        };

        Self {
            id,
            capacity,
            servers: config.servers,
            service_min: config.service_min,
            service_max: config.service_max,
            in_service: 0,
            waiting: 0,
            arrival_count: 0,
            loss_count: 0,
            departure_count: 0,
            time_in_state: vec![0.0; buckets],
        }
    }

    /// Credit `delta` time units to the current population
    pub fn accumulate(&mut self, delta: f64) {
        debug_assert!(delta >= 0.0, "negative time step {}", delta);
        let last = self.time_in_state.len() - 1;
        let state = self.population().min(last);
        self.time_in_state[state] += delta;
    }

    pub fn try_admit(&mut self) -> Admission {
        self.arrival_count += 1;

        if self.capacity.is_full(self.population()) {
            self.loss_count += 1;
            return Admission::Blocked;
        }

        if self.in_service < self.servers {
            self.in_service += 1;
            Admission::StartService
        } else {
            self.waiting += 1;
            Admission::Waiting
        }
    }

    /// Move the head of the line into a free server.
    /// Returns true when the caller must schedule a departure.
    pub fn start_next_waiting(&mut self) -> bool {
        if self.waiting > 0 && self.in_service < self.servers {
            self.waiting -= 1;
            self.in_service += 1;
            true
        } else {
            false
        }
    }

    /// Client leaves its server. Routing and refilling the server are up to the caller.
    pub fn complete_service(&mut self) {
        debug_assert!(self.in_service > 0, "{} completed service while idle", self.id);
        self.in_service = self.in_service.saturating_sub(1);
        self.departure_count += 1;
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn servers(&self) -> usize {
        self.servers
    }

    pub fn service_bounds(&self) -> (f64, f64) {
        (self.service_min, self.service_max)
    }

    pub fn mean_service_time(&self) -> f64 {
        (self.service_min + self.service_max) / 2.0
    }

    pub fn in_service(&self) -> usize {
        self.in_service
    }

    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Clients present, in service or waiting
    pub fn population(&self) -> usize {
        self.in_service + self.waiting
    }

    pub fn arrival_count(&self) -> u64 {
        self.arrival_count
    }

    pub fn loss_count(&self) -> u64 {
        self.loss_count
    }

    pub fn departure_count(&self) -> u64 {
        self.departure_count
    }

    pub fn time_in_state(&self) -> &[f64] {
        &self.time_in_state
    }

    pub fn total_time(&self) -> f64 {
        self.time_in_state.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(capacity: usize, servers: usize) -> Queue {
        let config = QueueConfig::new(capacity, servers, 1.0, 2.0);
        Queue::new(QueueId::new(0), &config, 10)
    }

    #[test]
    fn test_admission_fills_servers_then_waits() {
        let mut q = queue(3, 2);
        assert_eq!(q.try_admit(), Admission::StartService);
        assert_eq!(q.try_admit(), Admission::StartService);
        assert_eq!(q.try_admit(), Admission::Waiting);
        assert_eq!(q.in_service(), 2);
        assert_eq!(q.waiting(), 1);
        assert_eq!(q.population(), 3);
    }

    #[test]
    fn test_full_queue_blocks_and_counts_loss() {
        let mut q = queue(1, 1);
        assert_eq!(q.try_admit(), Admission::StartService);
        assert_eq!(q.try_admit(), Admission::Blocked);
        assert_eq!(q.loss_count(), 1);
        assert_eq!(q.arrival_count(), 2);
        assert_eq!(q.population(), 1);
    }

    #[test]
    fn test_completion_then_refill_from_line() {
        let mut q = queue(5, 1);
        q.try_admit();
        q.try_admit();
        q.complete_service();
        assert_eq!(q.population(), 1);
        assert_eq!(q.in_service(), 0);
        assert!(q.start_next_waiting());
        assert_eq!(q.in_service(), 1);
        assert_eq!(q.waiting(), 0);
        assert!(!q.start_next_waiting());
        assert_eq!(q.departure_count(), 1);
    }

    #[test]
    fn test_bucket_count_finite_and_unbounded() {
        assert_eq!(queue(5, 1).time_in_state().len(), 6);
        assert_eq!(queue(0, 1).time_in_state().len(), 10);
        assert_eq!(queue(0, 1).capacity(), Capacity::Unbounded);
    }

    #[test]
    fn test_accumulate_clamps_into_last_bucket() {
        let mut q = queue(0, 1);
        for _ in 0..25 {
            q.try_admit();
        }
        q.accumulate(2.5);
        assert_eq!(q.time_in_state()[9], 2.5);
        assert_eq!(q.loss_count(), 0);
        assert_eq!(q.total_time(), 2.5);
    }

    #[test]
    fn test_accumulate_tracks_current_population() {
        let mut q = queue(2, 1);
        q.accumulate(1.0);
        q.try_admit();
        q.accumulate(2.0);
        q.try_admit();
        q.accumulate(3.0);
        assert_eq!(q.time_in_state(), &[1.0, 2.0, 3.0]);
    }
}
