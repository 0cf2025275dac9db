//! Implementation of the scheduler which owns pending workloads and places them onto nodes.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::core::common::ResourceVector;
use crate::core::node::Node;
use crate::core::scheduler::interface::ScheduleError;
use crate::core::scheduler::queue::QueuedWorkloadKey;
use crate::core::workload::{Workload, WorkloadId};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlacementReport {
    /// Placed workloads with the name of the node they landed on, in placement order.
    pub placements: Vec<(WorkloadId, String)>,
    /// Workloads left pending after the pass.
    pub unscheduled: usize,
}

pub struct Scheduler {
    /// Workloads waiting for a node. Owned here until placed.
    pending: BTreeMap<WorkloadId, Workload>,
    /// Non-positive value added to every pending workload's priority on each decay pass.
    priority_recovery: i64,
}

impl Scheduler {
    pub fn new(workloads: Vec<Workload>, priority_recovery: i64) -> Result<Self, ScheduleError> {
        if priority_recovery > 0 {
            return Err(ScheduleError::PositiveRecoveryDelta(priority_recovery));
        }
        let mut scheduler = Self {
            pending: Default::default(),
            priority_recovery,
        };
        scheduler.add_pending_workloads(workloads);
        Ok(scheduler)
    }

    pub fn priority_recovery(&self) -> i64 {
        self.priority_recovery
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_workloads(&self) -> impl Iterator<Item = &Workload> {
        self.pending.values()
    }

    pub fn get_pending(&self, id: &WorkloadId) -> Option<&Workload> {
        self.pending.get(id)
    }

    /// Merges workloads into the pending set. A workload whose identity is already pending
    /// replaces the old entry.
    pub fn add_pending_workloads(&mut self, workloads: impl IntoIterator<Item = Workload>) {
        for workload in workloads {
            self.pending.insert(workload.id, workload);
        }
    }

    /// Decay pass: waiting workloads recover urgency, never going below 0.
    pub fn adjust_priority(&mut self) {
        for workload in self.pending.values_mut() {
            workload.shift_priority(self.priority_recovery);
        }
    }

    /// Pending workloads ordered by ascending priority value, ties by identity.
    pub fn sorted_pending(&self) -> Vec<QueuedWorkloadKey> {
        let mut queue: Vec<QueuedWorkloadKey> =
            self.pending.values().map(QueuedWorkloadKey::of).collect();
        queue.sort();
        queue
    }

    /// Probes `nodes` starting at `offset`, wrapping around once, and returns the index of the
    /// first node whose free capacity dominates `request`.
    pub fn place_one(
        request: &ResourceVector,
        nodes: &[Node],
        offset: usize,
    ) -> Result<usize, ScheduleError> {
        if nodes.is_empty() {
            return Err(ScheduleError::NoNodes);
        }
        for i in 0..nodes.len() {
            let node_idx = (i + offset) % nodes.len();
            debug!("searching for capacity on node {:?}", nodes[node_idx].name());
            if nodes[node_idx].admits(request) {
                return Ok(node_idx);
            }
        }
        Err(ScheduleError::AdmissionRejected)
    }

    /// Placement pass. Workloads are tried in priority order; the starting node rotates by one
    /// for every workload processed so that homogeneous nodes fill evenly. Workloads which no
    /// node admits stay pending for the next pass.
    pub fn schedule(&mut self, nodes: &mut [Node]) -> PlacementReport {
        info!(
            "scheduling {} workloads to {} nodes",
            self.pending.len(),
            nodes.len()
        );
        let mut report = PlacementReport::default();

        for (offset, key) in self.sorted_pending().into_iter().enumerate() {
            let request = match self.pending.get(&key.id) {
                Some(workload) => workload.request,
                None => continue,
            };

            let node_idx = match Self::place_one(&request, nodes, offset) {
                Ok(node_idx) => node_idx,
                Err(err) => {
                    debug!("failed to schedule workload {}: {}", key.id, err);
                    continue;
                }
            };

            if let Some(workload) = self.pending.remove(&key.id) {
                let node = &mut nodes[node_idx];
                info!(
                    "workload {} scheduled to node {:?}",
                    workload,
                    node.name()
                );
                report.placements.push((workload.id, node.name().to_string()));
                node.start(workload);
            }
        }

        report.unscheduled = self.pending.len();
        info!("scheduling completed, {} workloads unscheduled", report.unscheduled);
        report
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::core::common::ResourceVector;
    use crate::core::node::Node;
    use crate::core::scheduler::interface::ScheduleError;
    use crate::core::scheduler::scheduler::Scheduler;
    use crate::core::workload::Workload;

    fn workload(id: u128, cpu: u32, ram: u64, priority: u64) -> Workload {
        Workload::with_id(Uuid::from_u128(id), format!("w{}", id), cpu, ram, priority).unwrap()
    }

    fn node(name: &str, cpu: u32, ram: u64) -> Node {
        Node::new(name.to_string(), ResourceVector::new(cpu, ram), 10).unwrap()
    }

    #[test]
    fn test_positive_recovery_is_rejected() {
        assert_eq!(
            Scheduler::new(vec![], 5).err().unwrap(),
            ScheduleError::PositiveRecoveryDelta(5)
        );
        assert!(Scheduler::new(vec![], 0).is_ok());
    }

    #[test]
    fn test_no_nodes_no_schedule() {
        let request = ResourceVector::new(100, 100);
        assert_eq!(
            Scheduler::place_one(&request, &[], 0).err().unwrap(),
            ScheduleError::NoNodes
        );

        let mut scheduler = Scheduler::new(vec![workload(1, 100, 100, 0)], -10).unwrap();
        let report = scheduler.schedule(&mut []);
        assert!(report.placements.is_empty());
        assert_eq!(1, report.unscheduled);
    }

    #[test]
    fn test_place_one_rotates_start() {
        let nodes = vec![node("a", 1000, 1000), node("b", 1000, 1000), node("c", 1000, 1000)];
        let request = ResourceVector::new(100, 100);
        assert_eq!(Ok(0), Scheduler::place_one(&request, &nodes, 0));
        assert_eq!(Ok(1), Scheduler::place_one(&request, &nodes, 1));
        assert_eq!(Ok(0), Scheduler::place_one(&request, &nodes, 3));
    }

    #[test]
    fn test_place_one_wraps_around() {
        let nodes = vec![node("big", 1000, 1000), node("small", 100, 100)];
        let request = ResourceVector::new(500, 500);
        assert_eq!(Ok(0), Scheduler::place_one(&request, &nodes, 1));
    }

    #[test]
    fn test_exact_fit_is_not_admitted() {
        let nodes = vec![node("a", 1000, 1000)];
        assert_eq!(
            Err(ScheduleError::AdmissionRejected),
            Scheduler::place_one(&ResourceVector::new(1000, 1000), &nodes, 0)
        );
        assert_eq!(
            Err(ScheduleError::AdmissionRejected),
            Scheduler::place_one(&ResourceVector::new(1000, 10), &nodes, 0)
        );
    }

    #[test]
    fn test_add_pending_overwrites_same_identity() {
        let mut scheduler = Scheduler::new(vec![workload(1, 100, 100, 0)], -10).unwrap();
        scheduler.add_pending_workloads(vec![workload(1, 100, 100, 42), workload(2, 100, 100, 0)]);
        assert_eq!(2, scheduler.pending_count());
        assert_eq!(
            42,
            scheduler.get_pending(&Uuid::from_u128(1)).unwrap().priority
        );
    }

    #[test]
    fn test_adjust_priority_floors_at_zero() {
        let mut scheduler = Scheduler::new(
            vec![workload(1, 100, 100, 250), workload(2, 100, 100, 1000)],
            -100,
        )
        .unwrap();

        scheduler.adjust_priority();
        let priorities: Vec<u64> = scheduler.pending_workloads().map(|w| w.priority).collect();
        assert_eq!(vec![150, 900], priorities);

        for _ in 0..1000 {
            scheduler.adjust_priority();
        }
        assert!(scheduler.pending_workloads().all(|w| w.priority == 0));
    }

    #[test]
    fn test_most_urgent_workload_is_placed_first() {
        // Room for exactly one of the two workloads.
        let mut nodes = vec![node("a", 1000, 1000)];
        let mut scheduler = Scheduler::new(
            vec![workload(1, 600, 600, 500), workload(2, 600, 600, 10)],
            -10,
        )
        .unwrap();

        let report = scheduler.schedule(&mut nodes);
        assert_eq!(vec![(Uuid::from_u128(2), "a".to_string())], report.placements);
        assert_eq!(1, report.unscheduled);
        assert!(scheduler.get_pending(&Uuid::from_u128(1)).is_some());
        assert!(nodes[0].is_hosting(&Uuid::from_u128(2)));
    }

    #[test]
    fn test_capacity_is_rechecked_per_attempt() {
        let mut nodes = vec![node("a", 1000, 1000)];
        let workloads = (0..5).map(|i| workload(i, 300, 300, 0)).collect();
        let mut scheduler = Scheduler::new(workloads, -10).unwrap();

        scheduler.schedule(&mut nodes);
        // 3 x 300 leaves 100 free which does not dominate 300.
        assert_eq!(3, nodes[0].workload_count());
        assert_eq!(2, scheduler.pending_count());
        assert!(nodes[0].limit().dominates(&nodes[0].used()));
    }
}
