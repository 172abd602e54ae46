use std::path::PathBuf;
use thiserror::Error;

/// Reasons a network description is rejected before a run starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("network has no queues")]
    NoQueues,

    #[error("network has no external arrival source")]
    NoArrivals,

    #[error("queue {queue}: server count must be at least 1")]
    NoServers { queue: usize },

    #[error("{what}: bounds [{min}, {max}] must be finite, non-negative and ordered")]
    InvalidInterval { what: String, min: f64, max: f64 },

    #[error("routing matrix has {rows} rows, expected {expected}")]
    RoutingRowCount { rows: usize, expected: usize },

    #[error("routing row {row} has {len} columns, expected {expected}")]
    RoutingRowLength { row: usize, len: usize, expected: usize },

    #[error("routing entry [{row}][{column}] = {value} is not a probability")]
    RoutingEntry { row: usize, column: usize, value: f64 },

    #[error("routing row {row} sums to {sum}, which exceeds 1")]
    RoutingRowSum { row: usize, sum: f64 },

    #[error("arrival source {source_index} targets queue {queue}, network has {queues} queues")]
    UnknownEntryQueue {
        source_index: usize,
        queue: usize,
        queues: usize,
    },

    #[error("queue {queue} has more than one external arrival source")]
    DuplicateEntryQueue { queue: usize },

    #[error("arrival source {source_index}: first arrival time {time} must be finite and non-negative")]
    InvalidFirstArrival { source_index: usize, time: f64 },

    #[error("draw budget must be positive")]
    ZeroDrawBudget,

    #[error("unbounded_state_limit must be positive")]
    ZeroStateLimit,

    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("configuration parsing error: {0}")]
    Parsing(#[from] serde_yaml::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build replication thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
