use super::config::{ConcurrencyMode, ReplicationConfig};
use crate::core::config::SimulationConfig;
use crate::core::errors::SimulationError;
use crate::core::metrics::{QueueMetrics, SimulationReport};
use crate::core::simulation_engine::SimulationEngine;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

/// Run one replication per seed; reports come back in seed order
pub fn replicate(
    base: &SimulationConfig,
    seeds: &[u64],
    config: &ReplicationConfig,
) -> Result<Vec<SimulationReport>, SimulationError> {
    base.validate()?;
    info!(
        "Running {} replications ({:?})",
        seeds.len(),
        config.concurrency_mode
    );

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(|seed| run_seed(base, *seed)).collect(),
        ConcurrencyMode::Rayon => {
            let run_all = || {
                seeds
                    .par_iter()
                    .map(|seed| run_seed(base, *seed))
                    .collect::<Result<Vec<_>, _>>()
            };

            match config.thread_pool_size {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                    pool.install(run_all)
                }
                None => run_all(),
            }
        }
    }
}

fn run_seed(base: &SimulationConfig, seed: u64) -> Result<SimulationReport, SimulationError> {
    let config = base.clone().with_seed(seed);
    let mut engine = SimulationEngine::new(&config)?;
    Ok(engine.run())
}

/// Sample mean and standard deviation of one metric across replications
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub mean: f64,
    pub std_dev: f64,
}

impl Estimate {
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self { mean: 0.0, std_dev: 0.0 };
        }

        let mean = samples.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self { mean, std_dev }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub queue: usize,
    pub mean_population: Estimate,
    pub throughput: Estimate,
    pub utilization: Estimate,
    pub response_time: Estimate,
    pub losses: Estimate,
}

/// Per-queue estimates across a batch of replications of the same network
pub fn summarize(reports: &[SimulationReport]) -> Vec<QueueSummary> {
    let queues = reports.first().map_or(0, |report| report.queues.len());

    (0..queues)
        .map(|index| {
            let collect = |metric: fn(&QueueMetrics) -> f64| -> Estimate {
                let samples: Vec<f64> = reports
                    .iter()
                    .filter_map(|report| report.queues.get(index))
                    .map(metric)
                    .collect();
                Estimate::from_samples(&samples)
            };

            QueueSummary {
                queue: index,
                mean_population: collect(|m| m.mean_population),
                throughput: collect(|m| m.throughput),
                utilization: collect(|m| m.utilization),
                response_time: collect(|m| m.response_time),
                losses: collect(|m| m.losses as f64),
            }
        })
        .collect()
}
