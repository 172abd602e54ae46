//! Configuration for running independent replications
//!
//! A single run is always sequential. These settings only control how a
//! batch of independently seeded runs is spread over threads.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run on a Rayon thread pool
    Rayon,
}

#[derive(Debug, Clone, Default)]
pub struct ReplicationConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// Size of a dedicated thread pool; Rayon's global pool when `None`.
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl ReplicationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
