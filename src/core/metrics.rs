//! Performance metrics derived from the final state of a run.
//!
//! Everything here is a pure function of queue state and elapsed time, so
//! computing a report twice yields identical numbers. Any ratio whose
//! denominator is zero is reported as `0`.

use super::queue::Queue;
use super::state::EngineState;
use serde::Serialize;

/// Entries below this residence time are left out of the state listing
pub const NEGLIGIBLE_TIME: f64 = 1e-6;

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Time spent with a given population
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShare {
    pub population: usize,
    pub time: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueMetrics {
    /// Zero-based queue index
    pub queue: usize,
    /// `None` for unbounded queues
    pub capacity: Option<usize>,
    pub servers: usize,
    pub service_min: f64,
    pub service_max: f64,
    pub arrivals: u64,
    pub losses: u64,
    pub departures: u64,
    pub states: Vec<StateShare>,
    pub mean_population: f64,
    pub throughput: f64,
    pub utilization: f64,
    pub response_time: f64,
    /// Share of time spent full, finite queues only
    pub loss_probability: Option<f64>,
    /// `losses / arrivals`
    pub loss_ratio: f64,
}

impl QueueMetrics {
    pub fn from_queue(queue: &Queue, total_time: f64) -> Self {
        let time_in_state = queue.time_in_state();

        let states = time_in_state
            .iter()
            .enumerate()
            .filter(|(_, time)| **time > NEGLIGIBLE_TIME)
            .map(|(population, time)| StateShare {
                population,
                time: *time,
                percent: ratio(*time, total_time) * 100.0,
            })
            .collect();

        let weighted: f64 = time_in_state
            .iter()
            .enumerate()
            .map(|(population, time)| population as f64 * time)
            .sum();

        let mean_population = ratio(weighted, total_time);
        let throughput = ratio(queue.departure_count() as f64, total_time);
        let utilization =
            ratio(throughput * queue.mean_service_time(), queue.servers() as f64).min(1.0);
        let response_time = ratio(mean_population, throughput);

        let capacity = queue.capacity().limit();
        let loss_probability = capacity.map(|limit| {
            let full_time = time_in_state.get(limit).copied().unwrap_or(0.0);
            ratio(full_time, total_time)
        });

        let (service_min, service_max) = queue.service_bounds();

        Self {
            queue: queue.id().index(),
            capacity,
            servers: queue.servers(),
            service_min,
            service_max,
            arrivals: queue.arrival_count(),
            losses: queue.loss_count(),
            departures: queue.departure_count(),
            states,
            mean_population,
            throughput,
            utilization,
            response_time,
            loss_probability,
            loss_ratio: ratio(queue.loss_count() as f64, queue.arrival_count() as f64),
        }
    }
}

/// Everything a run hands to the reporter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub total_time: f64,
    pub timing_draws: u64,
    pub routing_draws: u64,
    pub draw_budget: u64,
    pub events_processed: u64,
    pub queues: Vec<QueueMetrics>,
}

impl SimulationReport {
    pub fn new(queues: &[Queue], state: &EngineState) -> Self {
        let total_time = state.global_time();
        Self {
            total_time,
            timing_draws: state.timing_draws(),
            routing_draws: state.routing_draws(),
            draw_budget: state.draw_budget(),
            events_processed: state.events_processed(),
            queues: queues
                .iter()
                .map(|queue| QueueMetrics::from_queue(queue, total_time))
                .collect(),
        }
    }
}
