//! Ordering key for the snapshot of pending workloads taken at the start of a placement pass.

use std::cmp::Ordering;

use crate::core::workload::{Workload, WorkloadId};

#[derive(Clone, Debug)]
pub struct QueuedWorkloadKey {
    pub priority: u64,
    pub id: WorkloadId,
}

impl QueuedWorkloadKey {
    pub fn of(workload: &Workload) -> Self {
        Self {
            priority: workload.priority,
            id: workload.id,
        }
    }
}

/// Lowest priority value first, ties broken by identity so that a pass is reproducible.
impl Ord for QueuedWorkloadKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for QueuedWorkloadKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedWorkloadKey {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.id == other.id
    }
}

impl Eq for QueuedWorkloadKey {}
