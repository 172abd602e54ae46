// Tests for SimulationEngine functionality
#[cfg(test)]
mod tests {
    use crate::core::config::{ArrivalConfig, DrawAccounting, QueueConfig, SimulationConfig};
    use crate::core::event::{Event, EventKind};
    use crate::core::queue::Queue;
    use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
    use crate::core::types::{Destination, QueueId};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Trace {
        events: Vec<Event>,
        routings: Vec<(QueueId, Destination)>,
        losses: usize,
    }

    struct Recorder(Rc<RefCell<Trace>>);

    impl SimulationObserver for Recorder {
        fn on_event(&mut self, event: &Event, _queues: &[Queue]) {
            self.0.borrow_mut().events.push(*event);
        }

        fn on_routing(&mut self, source: QueueId, destination: Destination) {
            self.0.borrow_mut().routings.push((source, destination));
        }

        fn on_loss(&mut self, _queue: QueueId, _time: f64) {
            self.0.borrow_mut().losses += 1;
        }
    }

    fn assert_invariants(engine: &SimulationEngine) {
        let now = engine.global_time();
        for queue in engine.queues() {
            let total = queue.total_time();
            assert!(
                (total - now).abs() <= 1e-9 * now.max(1.0),
                "{}: accumulated {} but clock is {}",
                queue.id(),
                total,
                now
            );
            assert!(queue.in_service() <= queue.servers());
            assert_eq!(queue.population(), queue.in_service() + queue.waiting());
            if let Some(limit) = queue.capacity().limit() {
                assert!(queue.population() <= limit);
            }
        }
    }

    #[test]
    fn test_first_step_admits_and_schedules() {
        let config = SimulationConfig::single_queue(QueueConfig::new(0, 1, 5.0, 6.0), 1.0, 3.0)
            .with_first_arrival(2.0);
        let mut engine = SimulationEngine::new(&config).unwrap();

        assert_eq!(engine.pending_events(), 1);
        assert_eq!(engine.state().timing_draws(), 0);

        assert!(engine.step());
        assert_eq!(engine.global_time(), 2.0);
        assert_eq!(engine.queues()[0].population(), 1);
        assert_eq!(engine.queues()[0].in_service(), 1);
        assert_eq!(engine.queues()[0].time_in_state()[0], 2.0);
        // next arrival and the departure
        assert_eq!(engine.pending_events(), 2);
        assert_eq!(engine.state().timing_draws(), 2);
    }

    #[test]
    fn test_drawn_first_arrival_consumes_budget() {
        let config = SimulationConfig::single_queue(QueueConfig::new(0, 1, 5.0, 6.0), 1.0, 3.0)
            .with_draw_budget(1);
        let mut engine = SimulationEngine::new(&config).unwrap();

        assert_eq!(engine.state().timing_draws(), 1);
        assert!(!engine.step());

        let report = engine.run();
        assert_eq!(report.total_time, 0.0);
        assert_eq!(report.events_processed, 0);
        assert_eq!(report.queues[0].throughput, 0.0);
        assert_eq!(report.queues[0].mean_population, 0.0);
    }

    #[test]
    fn test_invariants_hold_after_every_step() {
        let config = SimulationConfig::reference_network().with_draw_budget(5_000);
        let mut engine = SimulationEngine::new(&config).unwrap();

        while engine.step() {
            assert_invariants(&engine);
        }
        engine.finish();
        assert_invariants(&engine);
    }

    #[test]
    fn test_budget_consumed_exactly() {
        let config = SimulationConfig::reference_network().with_draw_budget(2_500);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let report = engine.run();

        assert_eq!(report.timing_draws, 2_500);
        assert!(report.routing_draws > 0);
        assert!(engine.is_finished());
        assert!(!engine.step());
    }

    #[test]
    fn test_all_accounting_counts_routing_draws() {
        let config = SimulationConfig::reference_network()
            .with_draw_budget(2_500)
            .with_draw_accounting(DrawAccounting::All);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let report = engine.run();

        assert!(report.routing_draws > 0);
        assert!(report.timing_draws < 2_500);
        assert!(report.timing_draws + report.routing_draws >= 2_500);
        assert!(engine.state().budget_exhausted());
    }

    #[test]
    fn test_every_departure_routes_once() {
        let config = SimulationConfig::reference_network().with_draw_budget(3_000);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let trace = Rc::new(RefCell::new(Trace::default()));
        engine.add_observer(Box::new(Recorder(trace.clone())));
        let report = engine.run();

        let trace = trace.borrow();
        let departures: Vec<&Event> = trace
            .events
            .iter()
            .filter(|event| event.kind == EventKind::Departure)
            .collect();
        assert_eq!(trace.routings.len(), departures.len());
        for (event, (source, _)) in departures.iter().zip(trace.routings.iter()) {
            assert_eq!(event.queue, *source);
        }
        assert_eq!(report.routing_draws as usize, departures.len());

        let total_losses: u64 = report.queues.iter().map(|q| q.losses).sum();
        assert_eq!(trace.losses as u64, total_losses);
        assert_eq!(report.events_processed as usize, trace.events.len());
    }

    #[test]
    fn test_events_never_go_back_in_time() {
        let config = SimulationConfig::reference_network().with_draw_budget(3_000);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let trace = Rc::new(RefCell::new(Trace::default()));
        engine.add_observer(Box::new(Recorder(trace.clone())));
        engine.run();

        let trace = trace.borrow();
        assert!(trace.events.windows(2).all(|pair| pair[0].time <= pair[1].time));
    }

    #[test]
    fn test_feedback_to_same_queue_keeps_server_bound() {
        let config = SimulationConfig::new(
            vec![ArrivalConfig::new(0, 1.0, 2.0).with_first_arrival(1.0)],
            vec![QueueConfig::new(4, 1, 1.0, 3.0)],
            vec![vec![0.9]],
        )
        .with_draw_budget(4_000);
        let mut engine = SimulationEngine::new(&config).unwrap();

        while engine.step() {
            assert_invariants(&engine);
        }
        assert!(engine.queues()[0].loss_count() > 0);
    }

    #[test]
    fn test_unbounded_queue_folds_overflow_into_last_bucket() {
        let config = SimulationConfig::single_queue(QueueConfig::new(0, 1, 5.0, 6.0), 1.0, 3.0)
            .with_unbounded_state_limit(10)
            .with_first_arrival(0.0)
            .with_draw_budget(2_000);
        let mut engine = SimulationEngine::new(&config).unwrap();
        engine.run();

        let queue = &engine.queues()[0];
        assert_eq!(queue.time_in_state().len(), 10);
        assert!(queue.population() > 10);
        assert!(queue.time_in_state()[9] > 0.0);
        assert!((queue.total_time() - engine.global_time()).abs() <= 1e-9 * engine.global_time());
    }

    #[test]
    fn test_multiple_entry_queues() {
        let config = SimulationConfig::new(
            vec![
                ArrivalConfig::new(0, 2.0, 4.0).with_first_arrival(1.0),
                ArrivalConfig::new(1, 3.0, 5.0),
            ],
            vec![QueueConfig::new(0, 2, 1.0, 2.0), QueueConfig::new(10, 1, 1.0, 2.0)],
            vec![vec![0.0, 0.5], vec![0.0, 0.0]],
        )
        .with_draw_budget(2_000);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let trace = Rc::new(RefCell::new(Trace::default()));
        engine.add_observer(Box::new(Recorder(trace.clone())));
        engine.run();

        let trace = trace.borrow();
        let arrivals_at = |index: usize| {
            trace
                .events
                .iter()
                .filter(|e| e.kind == EventKind::Arrival && e.queue.index() == index)
                .count()
        };
        assert!(arrivals_at(0) > 0);
        assert!(arrivals_at(1) > 0);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let config = SimulationConfig::reference_network().with_draw_budget(500);
        let mut engine = SimulationEngine::new(&config).unwrap();
        let first = engine.run();
        engine.finish();
        let second = engine.report();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig::single_queue(QueueConfig::new(3, 0, 1.0, 2.0), 1.0, 2.0);
        assert!(SimulationEngine::new(&config).is_err());
    }
}
