//! Events emitted between simulation components.

use serde::Serialize;

/// Event from the cycle runner to itself to run the next decay, place, cost, evict cycle.
#[derive(Serialize, Clone)]
pub struct RunSchedulingCycle {}
