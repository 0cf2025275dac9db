use thiserror::Error;

/// Errors surfaced by the placement core. None of them is fatal: the worst outcome of any of
/// them is a workload that stays pending.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// No node has free capacity strictly above the workload request.
    #[error("no node admits the workload request")]
    AdmissionRejected,

    #[error("no nodes to schedule on")]
    NoNodes,

    #[error("workload requested zero resources on every dimension")]
    RequestedResourcesAreZeros,

    /// Cost accrual divides by the node limit, so every dimension must be non-zero.
    #[error("node {0:?} has a zero dimension in its resource limit")]
    ZeroNodeLimit(String),

    #[error("priority recovery delta must not be positive, got {0}")]
    PositiveRecoveryDelta(i64),
}
