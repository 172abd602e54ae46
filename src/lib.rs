//! Discrete-event simulation of networks of finite-capacity, multi-server
//! queues with probabilistic routing.
//!
//! ```no_run
//! use qnet_sim::{SimulationConfig, SimulationEngine};
//!
//! let config = SimulationConfig::reference_network().with_seed(7);
//! let mut engine = SimulationEngine::new(&config)?;
//! let report = engine.run();
//! println!("{}", report);
//! # Ok::<(), qnet_sim::ConfigError>(())
//! ```

pub mod core;

// Re-export commonly used types
pub use crate::core::config::{ArrivalConfig, DrawAccounting, QueueConfig, SimulationConfig};
pub use crate::core::errors::{ConfigError, SimulationError};
pub use crate::core::event::{Event, EventKind};
pub use crate::core::execution::{replicate, summarize, ConcurrencyMode, ReplicationConfig};
pub use crate::core::metrics::{QueueMetrics, SimulationReport};
pub use crate::core::random::{GeneratorKind, VariateGenerator};
pub use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
pub use crate::core::types::{Capacity, Destination, QueueId};
