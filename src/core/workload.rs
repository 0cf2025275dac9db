//! Type definition for the workload primitive: a unit of demand with a resource request and a
//! priority value.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::core::common::{ObjectMeta, ResourceVector};
use crate::core::scheduler::interface::ScheduleError;

pub type WorkloadId = Uuid;

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Workload {
    pub id: WorkloadId,
    pub metadata: ObjectMeta,
    pub request: ResourceVector,
    /// Lower value means more urgent. Grows with cost accrual, shrinks with decay, never below 0.
    pub priority: u64,
}

impl Workload {
    pub fn new(name: String, cpu: u32, ram: u64, priority: u64) -> Result<Self, ScheduleError> {
        Self::with_id(Uuid::new_v4(), name, cpu, ram, priority)
    }

    pub fn with_id(
        id: WorkloadId,
        name: String,
        cpu: u32,
        ram: u64,
        priority: u64,
    ) -> Result<Self, ScheduleError> {
        let request = ResourceVector { cpu, ram };
        if request.is_zero() {
            return Err(ScheduleError::RequestedResourcesAreZeros);
        }
        Ok(Self {
            id,
            metadata: ObjectMeta::named(name),
            request,
            priority,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Shifts the priority by `delta`, saturating at 0 and at `u64::MAX`.
    pub fn shift_priority(&mut self, delta: i64) {
        self.priority = self.priority.saturating_add_signed(delta);
    }

    pub fn add_cost(&mut self, cost: u64) {
        self.priority = self.priority.saturating_add(cost);
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-({}, {})",
            self.metadata.name, self.id, self.priority, self.request.cpu, self.request.ram
        )
    }
}
