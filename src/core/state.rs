use super::config::DrawAccounting;

/// Clock and draw accounting for one run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    global_time: f64,
    last_event_time: f64,
    timing_draws: u64,
    routing_draws: u64,
    draw_budget: u64,
    accounting: DrawAccounting,
    events_processed: u64,
}

impl EngineState {
    pub fn new(draw_budget: u64, accounting: DrawAccounting) -> Self {
        Self {
            global_time: 0.0,
            last_event_time: 0.0,
            timing_draws: 0,
            routing_draws: 0,
            draw_budget,
            accounting,
            events_processed: 0,
        }
    }

    /// Move the clock to `time` and return the elapsed span to credit
    pub(crate) fn advance_to(&mut self, time: f64) -> f64 {
        let delta = (time - self.last_event_time).max(0.0);
        self.last_event_time = time;
        self.global_time = time;
        delta
    }

    /// Reserve one timing draw; false once the budget is spent
    pub(crate) fn try_consume_timing_draw(&mut self) -> bool {
        if self.budget_exhausted() {
            return false;
        }
        self.timing_draws += 1;
        true
    }

    pub(crate) fn record_routing_draw(&mut self) {
        self.routing_draws += 1;
    }

    pub(crate) fn record_event(&mut self) {
        self.events_processed += 1;
    }

    /// Draws that count against the budget under the active policy
    pub fn budgeted_draws(&self) -> u64 {
        match self.accounting {
            DrawAccounting::TimingOnly => self.timing_draws,
            DrawAccounting::All => self.timing_draws + self.routing_draws,
        }
    }

    pub fn budget_exhausted(&self) -> bool {
        self.budgeted_draws() >= self.draw_budget
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    pub fn timing_draws(&self) -> u64 {
        self.timing_draws
    }

    pub fn routing_draws(&self) -> u64 {
        self.routing_draws
    }

    pub fn draw_budget(&self) -> u64 {
        self.draw_budget
    }

    pub fn accounting(&self) -> DrawAccounting {
        self.accounting
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }
}
