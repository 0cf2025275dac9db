//! Simulation component which owns the scheduler together with the node pool and runs the
//! decay, place, cost and evict cycle at a fixed simulated interval.

use std::cell::RefCell;
use std::rc::Rc;

use dslab_core::{cast, log_debug, log_info, Event, EventHandler, SimulationContext};

use crate::config::SimulationConfig;
use crate::core::cost::{apply_cost_to_all, expire_above_threshold};
use crate::core::events::RunSchedulingCycle;
use crate::core::node::Node;
use crate::core::scheduler::scheduler::{PlacementReport, Scheduler};

use crate::metrics::collector::MetricsCollector;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    pub placement: PlacementReport,
    /// Cost charged to each hosted workload.
    pub costs: Vec<u64>,
    /// Priority values of the evicted workloads at eviction time.
    pub evicted_priorities: Vec<u64>,
}

/// One full cycle: decay, place, apply cost, evict and re-queue the evicted workloads.
pub fn run_cycle(
    scheduler: &mut Scheduler,
    nodes: &mut [Node],
    expiration_threshold: u64,
) -> CycleReport {
    scheduler.adjust_priority();
    let placement = scheduler.schedule(nodes);
    let costs = apply_cost_to_all(nodes);

    let expired = expire_above_threshold(nodes, expiration_threshold);
    let evicted_priorities = expired.iter().map(|w| w.priority).collect();
    scheduler.add_pending_workloads(expired);

    CycleReport {
        placement,
        costs,
        evicted_priorities,
    }
}

pub struct CycleRunner {
    scheduler: Scheduler,
    nodes: Vec<Node>,
    cycles_run: u64,

    ctx: SimulationContext,
    config: Rc<SimulationConfig>,

    metrics_collector: Rc<RefCell<MetricsCollector>>,
}

impl CycleRunner {
    pub fn new(
        scheduler: Scheduler,
        nodes: Vec<Node>,
        ctx: SimulationContext,
        config: Rc<SimulationConfig>,
        metrics_collector: Rc<RefCell<MetricsCollector>>,
    ) -> Self {
        Self {
            scheduler,
            nodes,
            cycles_run: 0,
            ctx,
            config,
            metrics_collector,
        }
    }

    pub fn start(&mut self) {
        log_info!(
            self.ctx,
            "Scheduling cycle started running every {} seconds",
            self.config.cycle_interval
        );
        self.ctx.emit_self_now(RunSchedulingCycle {});
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub fn hosted_count(&self) -> usize {
        self.nodes.iter().map(|n| n.workload_count()).sum()
    }

    fn cycles_exhausted(&self) -> bool {
        self.config
            .cycles
            .is_some_and(|cycles| self.cycles_run >= cycles)
    }

    fn run_scheduling_cycle(&mut self) {
        if self.cycles_exhausted() {
            return;
        }

        let report = run_cycle(
            &mut self.scheduler,
            &mut self.nodes,
            self.config.expiration_threshold,
        );
        self.cycles_run += 1;

        log_debug!(
            self.ctx,
            "cycle {}: placed {}, unscheduled {}, evicted {}",
            self.cycles_run,
            report.placement.placements.len(),
            report.placement.unscheduled,
            report.evicted_priorities.len()
        );
        self.metrics_collector.borrow_mut().record_cycle(&report);

        if !self.cycles_exhausted() {
            self.ctx
                .emit_self(RunSchedulingCycle {}, self.config.cycle_interval);
        }
    }
}

impl EventHandler for CycleRunner {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            RunSchedulingCycle {} => {
                self.run_scheduling_cycle();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::run_cycle;
    use crate::core::scheduler::scheduler::Scheduler;
    use crate::core::workload::Workload;
    use crate::test_util::helpers::{test_node, test_workload};

    #[test]
    fn test_heavy_workload_is_evicted_and_requeued() {
        let mut nodes = vec![test_node("a", 1000, 1000, 10)];
        let mut scheduler = Scheduler::new(vec![test_workload(1, 900, 900, 0)], -100).unwrap();

        // 10 x avg(90%, 90%) = 900 > 500
        let report = run_cycle(&mut scheduler, &mut nodes, 500);
        assert_eq!(1, report.placement.placements.len());
        assert_eq!(vec![900], report.costs);
        assert_eq!(vec![900], report.evicted_priorities);
        assert_eq!(0, nodes[0].workload_count());
        assert_eq!(1, scheduler.pending_count());

        // Decays to 800 and is placed again.
        let report = run_cycle(&mut scheduler, &mut nodes, 5000);
        assert_eq!(1, report.placement.placements.len());
        assert_eq!(
            1700,
            nodes[0].workload(&Uuid::from_u128(1)).unwrap().priority
        );
    }

    #[test]
    fn test_light_workload_is_evicted_later() {
        let mut nodes = vec![test_node("a", 8000, 16000, 10)];
        let light = Workload::new("light".to_string(), 1000, 1000, 0).unwrap();
        let mut scheduler = Scheduler::new(vec![light], -300).unwrap();

        // 10 x avg(12.5%, 6.25%) = 93 per cycle, crosses 500 on the 6th cycle.
        for _ in 0..5 {
            let report = run_cycle(&mut scheduler, &mut nodes, 500);
            assert!(report.evicted_priorities.is_empty());
        }
        let report = run_cycle(&mut scheduler, &mut nodes, 500);
        assert_eq!(vec![558], report.evicted_priorities);
    }
}
