use super::metrics::{QueueMetrics, SimulationReport};
use std::fmt;

const RULE: &str = "==============================================";

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Total simulated time: {:.2}", self.total_time)?;
        writeln!(
            f,
            "Random draws used: {} timing (budget {}), {} routing",
            self.timing_draws, self.draw_budget, self.routing_draws
        )?;
        writeln!(f, "Events processed: {}", self.events_processed)?;
        writeln!(f, "{}", RULE)?;

        for queue in &self.queues {
            writeln!(f)?;
            write!(f, "{}", queue)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueueMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capacity = match self.capacity {
            Some(limit) => limit.to_string(),
            None => "unbounded".to_string(),
        };

        writeln!(f, "--- Queue {} ---", self.queue + 1)?;
        writeln!(f, "Capacity: {}, Servers: {}", capacity, self.servers)?;
        writeln!(
            f,
            "Service time between {:.2} and {:.2}",
            self.service_min, self.service_max
        )?;
        writeln!(f, "Time per state:")?;
        for state in &self.states {
            writeln!(
                f,
                "{:>5} clients: time={:.2} ({:.2}%)",
                state.population, state.time, state.percent
            )?;
        }
        writeln!(f, "   - Mean population:  {:.4}", self.mean_population)?;
        writeln!(f, "   - Throughput:       {:.4}", self.throughput)?;
        writeln!(f, "   - Utilization:      {:.4}", self.utilization)?;
        writeln!(f, "   - Response time:    {:.4}", self.response_time)?;
        writeln!(f, "   - Arrivals:         {}", self.arrivals)?;
        writeln!(f, "   - Losses:           {}", self.losses)?;
        if let Some(probability) = self.loss_probability {
            writeln!(f, "   - Loss probability: {:.4}", probability)?;
        }
        writeln!(f, "{}", RULE)
    }
}
