pub mod common;
pub mod cost;
pub mod cycle;
pub mod events;
pub mod node;
pub mod scheduler;
pub mod workload;
