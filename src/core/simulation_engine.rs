use super::config::SimulationConfig;
use super::errors::ConfigError;
use super::event::{Event, EventKind};
use super::event_scheduler::EventScheduler;
use super::metrics::SimulationReport;
use super::queue::Queue;
use super::random::VariateGenerator;
use super::router::RoutingMatrix;
use super::state::EngineState;
use super::types::{Admission, Destination, QueueId};
use log::{debug, info, trace};

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called after an event has been fully processed
    fn on_event(&mut self, _event: &Event, _queues: &[Queue]) {}

    /// Called for every routing decision taken by a departing client
    fn on_routing(&mut self, _source: QueueId, _destination: Destination) {}

    /// Called when a client is turned away by a full queue
    fn on_loss(&mut self, _queue: QueueId, _time: f64) {}
}

/// Discrete-event engine for one run over a queueing network.
///
/// Owns every piece of run state: queues, pending events, the variate
/// generator and the clock. Independent engines never share anything.
pub struct SimulationEngine {
    state: EngineState,
    queues: Vec<Queue>,
    scheduler: EventScheduler,
    router: RoutingMatrix,
    generator: VariateGenerator,
    /// Inter-arrival bounds per queue, `None` for queues without external arrivals
    arrival_sources: Vec<Option<(f64, f64)>>,
    observers: Vec<Box<dyn SimulationObserver>>,
    finished: bool,
}

impl SimulationEngine {
    /// Build an engine from a configuration, validating it first
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queues = config
            .queues
            .iter()
            .enumerate()
            .map(|(index, queue)| Queue::new(QueueId::new(index), queue, config.unbounded_state_limit))
            .collect();

        let mut arrival_sources = vec![None; config.queues.len()];
        for arrival in &config.arrivals {
            arrival_sources[arrival.queue] = Some((arrival.min, arrival.max));
        }

        let mut engine = Self {
            state: EngineState::new(config.draw_budget, config.draw_accounting),
            queues,
            scheduler: EventScheduler::new(),
            router: config.routing_matrix(),
            generator: VariateGenerator::new(config.generator, config.seed),
            arrival_sources,
            observers: Vec::new(),
            finished: false,
        };

        for arrival in &config.arrivals {
            let first = match arrival.first_arrival {
                Some(time) => Some(time),
                None => engine.timing_draw(arrival.min, arrival.max),
            };
            if let Some(time) = first {
                engine.scheduler.insert(Event::arrival(time, QueueId::new(arrival.queue)));
            }
        }

        debug!(
            "Engine ready: {} queues, {} arrival sources, draw budget {}",
            engine.queues.len(),
            config.arrivals.len(),
            config.draw_budget
        );

        Ok(engine)
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run until the schedule empties or the draw budget is spent, then report
    pub fn run(&mut self) -> SimulationReport {
        while self.step() {}
        self.finish();
        self.report()
    }

    /// Process one event, returns false once the run has stopped
    pub fn step(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if self.state.budget_exhausted() {
            debug!(
                "Draw budget of {} reached at t={:.4}",
                self.state.draw_budget(),
                self.state.global_time()
            );
            return false;
        }

        let event = match self.scheduler.pop_earliest() {
            Some(event) => event,
            None => {
                debug!("Schedule empty at t={:.4}", self.state.global_time());
                return false;
            }
        };

        self.advance_clock(event.time);
        trace!("t={:.4} {:?} at {}", event.time, event.kind, event.queue);

        match event.kind {
            EventKind::Arrival => self.handle_arrival(event.queue),
            EventKind::Departure => self.handle_departure(event.queue),
        }
        self.state.record_event();

        for observer in &mut self.observers {
            observer.on_event(&event, &self.queues);
        }

        true
    }

    /// Close the time bookkeeping at the final clock value. Idempotent.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        let now = self.state.global_time();
        self.advance_clock(now);
        self.finished = true;

        info!(
            "Simulation finished at t={:.4} after {} events, {} timing draws, {} routing draws",
            now,
            self.state.events_processed(),
            self.state.timing_draws(),
            self.state.routing_draws()
        );
    }

    /// Derive metrics from the current state
    pub fn report(&self) -> SimulationReport {
        SimulationReport::new(&self.queues, &self.state)
    }

    fn advance_clock(&mut self, time: f64) {
        let delta = self.state.advance_to(time);
        for queue in &mut self.queues {
            queue.accumulate(delta);
        }
    }

    fn handle_arrival(&mut self, queue: QueueId) {
        if let Some((min, max)) = self.arrival_sources[queue.index()] {
            if let Some(interval) = self.timing_draw(min, max) {
                let next = self.state.global_time() + interval;
                self.scheduler.insert(Event::arrival(next, queue));
            }
        }
        self.admit(queue);
    }

    fn handle_departure(&mut self, queue: QueueId) {
        self.queues[queue.index()].complete_service();

        if let Destination::Queue(target) = self.route(queue) {
            self.admit(target);
        }

        if self.queues[queue.index()].start_next_waiting() {
            self.schedule_departure(queue);
        }
    }

    fn admit(&mut self, queue: QueueId) {
        match self.queues[queue.index()].try_admit() {
            Admission::StartService => self.schedule_departure(queue),
            Admission::Waiting => {}
            Admission::Blocked => {
                let now = self.state.global_time();
                trace!("t={:.4} client lost at {}", now, queue);
                for observer in &mut self.observers {
                    observer.on_loss(queue, now);
                }
            }
        }
    }

    fn schedule_departure(&mut self, queue: QueueId) {
        let (min, max) = self.queues[queue.index()].service_bounds();
        if let Some(service) = self.timing_draw(min, max) {
            let time = self.state.global_time() + service;
            self.scheduler.insert(Event::departure(time, queue));
        }
    }

    fn route(&mut self, source: QueueId) -> Destination {
        let generator = &mut self.generator;
        let destination = self.router.route(source, || generator.next());
        self.state.record_routing_draw();

        for observer in &mut self.observers {
            observer.on_routing(source, destination);
        }
        destination
    }

    /// Uniform timing draw, `None` once the budget is spent
    fn timing_draw(&mut self, min: f64, max: f64) -> Option<f64> {
        if self.state.try_consume_timing_draw() {
            Some(self.generator.uniform(min, max))
        } else {
            None
        }
    }

    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    pub fn queue(&self, id: QueueId) -> Option<&Queue> {
        self.queues.get(id.index())
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Get current simulation time
    pub fn global_time(&self) -> f64 {
        self.state.global_time()
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
