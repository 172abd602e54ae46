pub mod config;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod metrics;
pub mod queue;
pub mod random;
pub mod report;
pub mod router;
pub mod simulation_engine;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
