//! Represents entry point for simulator.

use log::info;
use std::time::Instant;
use std::{cell::RefCell, rc::Rc};

use dslab_core::simulation::Simulation;

use crate::config::SimulationConfig;
use crate::core::cycle::CycleRunner;
use crate::core::node::Node;
use crate::core::scheduler::interface::ScheduleError;
use crate::core::scheduler::scheduler::Scheduler;
use crate::core::workload::Workload;
use crate::metrics::collector::MetricsCollector;
use crate::trace::generator::{nodes_from_groups, random_workloads, workloads_from_groups};

pub struct FeedbackSimulation {
    pub config: Rc<SimulationConfig>,
    pub sim: Simulation,

    pub cycle_runner: Rc<RefCell<CycleRunner>>,
    pub metrics_collector: Rc<RefCell<MetricsCollector>>,
}

impl FeedbackSimulation {
    /// Builds the simulation with workloads and nodes generated from the config groups.
    pub fn new(config: Rc<SimulationConfig>) -> Result<Self, ScheduleError> {
        let mut sim = Simulation::new(config.seed);

        let mut workloads = workloads_from_groups(&mut sim, &config.workloads)?;
        if let Some(random) = config.random_workloads.as_ref() {
            workloads.extend(random_workloads(&mut sim, random)?);
        }
        let nodes = nodes_from_groups(&config.nodes)?;

        Self::with_inputs(config, sim, workloads, nodes)
    }

    /// Builds the simulation from externally supplied workloads and nodes.
    pub fn with_inputs(
        config: Rc<SimulationConfig>,
        mut sim: Simulation,
        workloads: Vec<Workload>,
        nodes: Vec<Node>,
    ) -> Result<Self, ScheduleError> {
        info!(
            "Creating feedback scheduler simulation {:?} with config: {:?}",
            config.sim_name, config
        );
        info!(
            "{} workloads, {} nodes",
            workloads.len(),
            nodes.len()
        );

        let metrics_collector = Rc::new(RefCell::new(MetricsCollector::new()));
        {
            let mut metrics = metrics_collector.borrow_mut();
            metrics.total_workloads = workloads.len() as u64;
            metrics.total_nodes = nodes.len() as u64;
        }

        let scheduler = Scheduler::new(workloads, config.priority_recovery)?;

        let cycle_runner_component_name = "cycle_runner";
        let cycle_runner_context = sim.create_context(cycle_runner_component_name);
        let cycle_runner = Rc::new(RefCell::new(CycleRunner::new(
            scheduler,
            nodes,
            cycle_runner_context,
            config.clone(),
            metrics_collector.clone(),
        )));
        sim.add_handler(cycle_runner_component_name, cycle_runner.clone());

        Ok(FeedbackSimulation {
            config,
            sim,
            cycle_runner,
            metrics_collector,
        })
    }

    pub fn start(&mut self) {
        self.cycle_runner.borrow_mut().start();
    }

    /// Runs until the configured number of cycles is done. Requires `cycles` in config, otherwise
    /// the cycle never stops re-emitting itself.
    pub fn run_until_no_events(&mut self) {
        self.start();

        let t = Instant::now();
        self.sim.step_until_no_events();
        let duration = t.elapsed().as_secs_f64();
        info!(
            "Processed {} events in {:.2?}s ({:.0} events/s)",
            self.sim.event_count(),
            duration,
            self.sim.event_count() as f64 / duration
        );
        info!("Finished at {}", self.sim.time());
    }

    /// Returns `true` if there could be more pending events and `false` otherwise.
    pub fn step_for_duration(&mut self, duration: f64) -> bool {
        self.sim.step_for_duration(duration)
    }

    pub fn step(&mut self) {
        self.sim.step();
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycle_runner.borrow().cycles_run()
    }

    pub fn pending_count(&self) -> usize {
        self.cycle_runner.borrow().scheduler().pending_count()
    }

    pub fn hosted_count(&self) -> usize {
        self.cycle_runner.borrow().hosted_count()
    }
}
