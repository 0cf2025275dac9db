//! Node: a capacity-bounded host for workloads which charges hosted workloads for the share of
//! its resources they hold.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::core::common::{ObjectMeta, ResourceVector};
use crate::core::scheduler::interface::ScheduleError;
use crate::core::workload::{Workload, WorkloadId};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Node {
    pub metadata: ObjectMeta,
    limit: ResourceVector,
    cost_multiplier: u64,
    /// Hosted workloads are owned by the node until they are stopped.
    workloads: BTreeMap<WorkloadId, Workload>,
}

impl Node {
    pub fn new(
        name: String,
        limit: ResourceVector,
        cost_multiplier: u64,
    ) -> Result<Self, ScheduleError> {
        if limit.has_zero_dimension() {
            return Err(ScheduleError::ZeroNodeLimit(name));
        }
        Ok(Self {
            metadata: ObjectMeta::named(name),
            limit,
            cost_multiplier,
            workloads: Default::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn limit(&self) -> ResourceVector {
        self.limit
    }

    pub fn cost_multiplier(&self) -> u64 {
        self.cost_multiplier
    }

    pub fn workloads(&self) -> impl Iterator<Item = &Workload> {
        self.workloads.values()
    }

    pub fn workload(&self, id: &WorkloadId) -> Option<&Workload> {
        self.workloads.get(id)
    }

    pub fn workload_count(&self) -> usize {
        self.workloads.len()
    }

    pub fn is_hosting(&self, id: &WorkloadId) -> bool {
        self.workloads.contains_key(id)
    }

    /// Resources currently claimed by hosted workloads.
    pub fn used(&self) -> ResourceVector {
        ResourceVector::sum(self.workloads.values().map(|w| &w.request))
    }

    /// Free capacity, derived from the hosted set on every call.
    pub fn capacity(&self) -> ResourceVector {
        self.limit.capacity_above(&self.used())
    }

    /// Admission test used by the scheduler before `start`.
    pub fn admits(&self, request: &ResourceVector) -> bool {
        self.capacity().dominates(request)
    }

    /// Hosts the workload without any capacity check. A workload with the same identity is
    /// replaced and returned.
    pub fn start(&mut self, workload: Workload) -> Option<Workload> {
        self.workloads.insert(workload.id, workload)
    }

    /// Removes the workload from the node. Stopping an identity which is not hosted is a no-op
    /// and returns `None`.
    pub fn stop(&mut self, id: &WorkloadId) -> Option<Workload> {
        self.workloads.remove(id)
    }

    /// Identities of hosted workloads matching `predicate`, in identity order.
    pub(crate) fn hosted_ids_where(
        &self,
        predicate: impl Fn(&Workload) -> bool,
    ) -> Vec<WorkloadId> {
        self.workloads
            .values()
            .filter(|w| predicate(w))
            .map(|w| w.id)
            .collect()
    }

    /// Cost of hosting `workload` for one cycle: the multiplier times the average of cpu and ram
    /// utilization percents, floored.
    pub fn compute_cost(&self, workload: &Workload) -> u64 {
        let cpu_percent = workload.request.cpu as f64 / self.limit.cpu as f64 * 100.0;
        let ram_percent = workload.request.ram as f64 / self.limit.ram as f64 * 100.0;
        let average = (cpu_percent + ram_percent) / 2.0;

        (self.cost_multiplier as f64 * average) as u64
    }

    /// Charges every hosted workload its cost, raising its priority value. Returns the costs in
    /// hosting order.
    pub fn apply_cost(&mut self) -> Vec<u64> {
        let costs: Vec<u64> = self
            .workloads
            .values()
            .map(|w| self.compute_cost(w))
            .collect();

        for (workload, cost) in self.workloads.values_mut().zip(costs.iter()) {
            workload.add_cost(*cost);
            debug!(
                "priority cost {} applied to workload {} on node {:?}",
                cost, workload, self.metadata.name
            );
        }
        costs
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-x{}-({}, {})",
            self.metadata.name, self.cost_multiplier, self.limit.cpu, self.limit.ram
        )?;
        for workload in self.workloads.values() {
            write!(f, "\n{}", workload)?;
        }
        Ok(())
    }
}
