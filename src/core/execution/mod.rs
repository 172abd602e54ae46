pub mod config;
pub mod replication;

// Re-export commonly used types
pub use config::{ConcurrencyMode, ReplicationConfig};
pub use replication::{replicate, summarize, Estimate, QueueSummary};
