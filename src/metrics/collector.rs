//! Implements centralized storage for metrics. The cycle runner reports placements, costs and
//! evictions here on every cycle.

use average::{concatenate, Estimate, Max, Mean, Min, Variance};

use crate::core::cycle::CycleReport;

concatenate!(
    Estimator,
    [Min, min],
    [Max, max],
    [Mean, mean],
    [Variance, population_variance]
);

#[derive(Debug, Default)]
pub struct EstimatorWrapper {
    estimator: Estimator,
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("mean", &self.mean)
            .field("population_variance", &self.population_variance)
            .finish()
    }
}

impl EstimatorWrapper {
    pub fn new() -> Self {
        Self {
            estimator: Estimator::new(),
        }
    }

    pub fn add(&mut self, value: f64) {
        self.estimator.add(value);
    }

    pub fn min(&self) -> f64 {
        self.estimator.min()
    }

    pub fn max(&self) -> f64 {
        self.estimator.max()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean()
    }

    pub fn population_variance(&self) -> f64 {
        self.estimator.population_variance()
    }
}

impl PartialEq for EstimatorWrapper {
    fn eq(&self, other: &Self) -> bool {
        // NaN stats of empty estimators compare equal
        let same = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
        same(self.min(), other.min())
            && same(self.max(), other.max())
            && same(self.mean(), other.mean())
            && same(self.population_variance(), other.population_variance())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MetricsCollector {
    /// The number of workloads known to the simulation. Set before the first cycle.
    pub total_workloads: u64,
    /// The number of nodes in the pool.
    pub total_nodes: u64,
    /// The number of completed cycles.
    pub cycles: u64,
    /// Total successful placements over all cycles. A workload evicted and placed again counts
    /// twice.
    pub workloads_placed: u64,
    /// Total evictions over all cycles.
    pub workloads_evicted: u64,
    /// Workloads still pending after the last placement pass.
    pub workloads_unscheduled: u64,

    /// Estimations for the pending set size left after each placement pass.
    pub pending_after_placement_stats: EstimatorWrapper,
    /// Estimations for the cost charged to a single hosted workload in a single cycle.
    pub cost_stats: EstimatorWrapper,
    /// Estimations for the priority value of workloads at the moment they were evicted.
    pub eviction_priority_stats: EstimatorWrapper,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_workloads: 0,
            total_nodes: 0,
            cycles: 0,
            workloads_placed: 0,
            workloads_evicted: 0,
            workloads_unscheduled: 0,
            pending_after_placement_stats: EstimatorWrapper::new(),
            cost_stats: EstimatorWrapper::new(),
            eviction_priority_stats: EstimatorWrapper::new(),
        }
    }

    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.workloads_placed += report.placement.placements.len() as u64;
        self.workloads_evicted += report.evicted_priorities.len() as u64;
        self.workloads_unscheduled = report.placement.unscheduled as u64;

        self.pending_after_placement_stats
            .add(report.placement.unscheduled as f64);
        for cost in report.costs.iter() {
            self.cost_stats.add(*cost as f64);
        }
        for priority in report.evicted_priorities.iter() {
            self.eviction_priority_stats.add(*priority as f64);
        }
    }
}
