use std::{cell::RefCell, rc::Rc};

use dslab_feedback_scheduler::core::workload::WorkloadId;
use dslab_feedback_scheduler::metrics::collector::MetricsCollector;
use dslab_feedback_scheduler::simulator::FeedbackSimulation;
use dslab_feedback_scheduler::test_util::helpers::default_test_simulation_config;

fn run_simulation() -> (Rc<RefCell<MetricsCollector>>, Vec<(String, Vec<WorkloadId>)>) {
    let mut config = default_test_simulation_config(Some(
        r#"
    cycles: 25
    random_workloads:
      count: 40
      max_cpu: 4000
      max_ram: 8000
    "#,
    ));
    // fixing seed
    config.seed = 46;

    let mut sim = FeedbackSimulation::new(Rc::new(config)).unwrap();
    sim.run_until_no_events();

    let placements = sim
        .cycle_runner
        .borrow()
        .nodes()
        .iter()
        .map(|n| (n.name().to_string(), n.workloads().map(|w| w.id).collect()))
        .collect();
    (sim.metrics_collector.clone(), placements)
}

#[test]
pub fn test_simulation_determinism() {
    let (first_metric_collector, first_placements) = run_simulation();

    for _ in 0..5 {
        let (current, placements) = run_simulation();

        assert_eq!(*first_metric_collector.borrow(), *current.borrow());
        assert_eq!(first_placements, placements);
    }
}
