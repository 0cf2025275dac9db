pub mod interface;
pub mod queue;
pub mod scheduler;
