//! Network description for a simulation run.
//!
//! A [`SimulationConfig`] lists the external arrival sources, the queues
//! and the routing matrix, plus the run parameters (seed, draw budget,
//! generator). It can be built in code with the `with_*` methods or loaded
//! from YAML, and is validated before an engine accepts it.

use super::errors::ConfigError;
use super::random::GeneratorKind;
use super::router::RoutingMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const ROW_SUM_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_SEED: u64 = 12345;
pub const DEFAULT_DRAW_BUDGET: u64 = 100_000;
pub const DEFAULT_UNBOUNDED_STATE_LIMIT: usize = 1000;

/// Which draws count against the draw budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawAccounting {
    /// Only inter-arrival and service time draws consume budget
    #[default]
    TimingOnly,
    /// Routing draws consume budget as well
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Servers plus waiting room; `0` means unbounded
    pub capacity: usize,
    pub servers: usize,
    pub service_min: f64,
    pub service_max: f64,
}

impl QueueConfig {
    pub fn new(capacity: usize, servers: usize, service_min: f64, service_max: f64) -> Self {
        Self {
            capacity,
            servers,
            service_min,
            service_max,
        }
    }
}

/// Stream of clients entering the network from outside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// Entry queue index
    pub queue: usize,
    /// Inter-arrival interval bounds
    pub min: f64,
    pub max: f64,
    /// Time of the first arrival; drawn from `[min, max)` when absent
    #[serde(default)]
    pub first_arrival: Option<f64>,
}

impl ArrivalConfig {
    pub fn new(queue: usize, min: f64, max: f64) -> Self {
        Self {
            queue,
            min,
            max,
            first_arrival: None,
        }
    }

    pub fn with_first_arrival(mut self, time: f64) -> Self {
        self.first_arrival = Some(time);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub arrivals: Vec<ArrivalConfig>,
    pub queues: Vec<QueueConfig>,
    /// Square matrix; empty means every client leaves after its first service
    #[serde(default)]
    pub routing: Vec<Vec<f64>>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_draw_budget")]
    pub draw_budget: u64,
    /// Statistics buckets kept for unbounded queues
    #[serde(default = "default_unbounded_state_limit")]
    pub unbounded_state_limit: usize,
    #[serde(default)]
    pub draw_accounting: DrawAccounting,
    #[serde(default)]
    pub generator: GeneratorKind,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_draw_budget() -> u64 {
    DEFAULT_DRAW_BUDGET
}

fn default_unbounded_state_limit() -> usize {
    DEFAULT_UNBOUNDED_STATE_LIMIT
}

impl SimulationConfig {
    pub fn new(arrivals: Vec<ArrivalConfig>, queues: Vec<QueueConfig>, routing: Vec<Vec<f64>>) -> Self {
        Self {
            arrivals,
            queues,
            routing,
            seed: DEFAULT_SEED,
            draw_budget: DEFAULT_DRAW_BUDGET,
            unbounded_state_limit: DEFAULT_UNBOUNDED_STATE_LIMIT,
            draw_accounting: DrawAccounting::default(),
            generator: GeneratorKind::default(),
        }
    }

    /// One queue fed from outside; every client leaves after service
    pub fn single_queue(queue: QueueConfig, arrival_min: f64, arrival_max: f64) -> Self {
        Self::new(
            vec![ArrivalConfig::new(0, arrival_min, arrival_max)],
            vec![queue],
            Vec::new(),
        )
    }

    /// Two queues in series: everything leaving the first enters the second
    pub fn tandem(first: QueueConfig, second: QueueConfig, arrival_min: f64, arrival_max: f64) -> Self {
        Self::new(
            vec![ArrivalConfig::new(0, arrival_min, arrival_max)],
            vec![first, second],
            vec![vec![0.0, 1.0], vec![0.0, 0.0]],
        )
    }

    /// Three-queue network with feedback used as the default experiment
    pub fn reference_network() -> Self {
        Self::new(
            vec![ArrivalConfig::new(0, 2.0, 4.0).with_first_arrival(2.0)],
            vec![
                QueueConfig::new(0, 1, 1.0, 2.0),
                QueueConfig::new(5, 2, 4.0, 6.0),
                QueueConfig::new(10, 2, 5.0, 15.0),
            ],
            vec![
                vec![0.0, 0.8, 0.2],
                vec![0.3, 0.0, 0.5],
                vec![0.0, 0.7, 0.0],
            ],
        )
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_draw_budget(mut self, budget: u64) -> Self {
        self.draw_budget = budget;
        self
    }

    pub fn with_unbounded_state_limit(mut self, limit: usize) -> Self {
        self.unbounded_state_limit = limit;
        self
    }

    pub fn with_draw_accounting(mut self, accounting: DrawAccounting) -> Self {
        self.draw_accounting = accounting;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// Set a fixed first arrival time on every arrival source
    pub fn with_first_arrival(mut self, time: f64) -> Self {
        for arrival in &mut self.arrivals {
            arrival.first_arrival = Some(time);
        }
        self
    }

    pub fn routing_matrix(&self) -> RoutingMatrix {
        if self.routing.is_empty() {
            RoutingMatrix::all_exit(self.queues.len())
        } else {
            RoutingMatrix::new(self.routing.clone())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queues.is_empty() {
            return Err(ConfigError::NoQueues);
        }
        if self.arrivals.is_empty() {
            return Err(ConfigError::NoArrivals);
        }
        if self.draw_budget == 0 {
            return Err(ConfigError::ZeroDrawBudget);
        }
        if self.unbounded_state_limit == 0 {
            return Err(ConfigError::ZeroStateLimit);
        }

        for (index, queue) in self.queues.iter().enumerate() {
            if queue.servers == 0 {
                return Err(ConfigError::NoServers { queue: index });
            }
            check_interval(
                || format!("queue {} service time", index),
                queue.service_min,
                queue.service_max,
            )?;
        }

        let mut entry_queues = HashSet::new();
        for (index, arrival) in self.arrivals.iter().enumerate() {
            if arrival.queue >= self.queues.len() {
                return Err(ConfigError::UnknownEntryQueue {
                    source_index: index,
                    queue: arrival.queue,
                    queues: self.queues.len(),
                });
            }
            if !entry_queues.insert(arrival.queue) {
                return Err(ConfigError::DuplicateEntryQueue { queue: arrival.queue });
            }
            check_interval(
                || format!("arrival source {} interval", index),
                arrival.min,
                arrival.max,
            )?;
            if let Some(time) = arrival.first_arrival {
                if !time.is_finite() || time < 0.0 {
                    return Err(ConfigError::InvalidFirstArrival {
                        source_index: index,
                        time,
                    });
                }
            }
        }

        self.validate_routing()
    }

    fn validate_routing(&self) -> Result<(), ConfigError> {
        if self.routing.is_empty() {
            return Ok(());
        }

        let expected = self.queues.len();
        if self.routing.len() != expected {
            return Err(ConfigError::RoutingRowCount {
                rows: self.routing.len(),
                expected,
            });
        }

        for (row, entries) in self.routing.iter().enumerate() {
            if entries.len() != expected {
                return Err(ConfigError::RoutingRowLength {
                    row,
                    len: entries.len(),
                    expected,
                });
            }
            for (column, value) in entries.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(ConfigError::RoutingEntry {
                        row,
                        column,
                        value: *value,
                    });
                }
            }
            let sum: f64 = entries.iter().sum();
            if sum > 1.0 + ROW_SUM_TOLERANCE {
                return Err(ConfigError::RoutingRowSum { row, sum });
            }
        }

        Ok(())
    }

    /// Parse and validate a YAML network description
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }
}

fn check_interval<F>(what: F, min: f64, max: f64) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval {
            what: what(),
            min,
            max,
        })
    }
}
