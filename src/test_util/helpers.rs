use uuid::Uuid;

use crate::config::SimulationConfig;
use crate::core::common::ResourceVector;
use crate::core::node::Node;
use crate::core::workload::Workload;

pub fn default_test_simulation_config(with_suffix: Option<&str>) -> SimulationConfig {
    let mut default = r#"
    sim_name: "test_feedback_scheduler"
    seed: 123
    cycle_interval: 5.0
    priority_recovery: -300
    expiration_threshold: 500
    "#
    .to_string();

    if let Some(suffix) = with_suffix {
        default.push_str(suffix);
    }

    serde_yaml::from_str::<SimulationConfig>(&default).unwrap()
}

/// Workload with an identity derived from `id`, so tests get a stable tie-break order.
pub fn test_workload(id: u128, cpu: u32, ram: u64, priority: u64) -> Workload {
    Workload::with_id(Uuid::from_u128(id), format!("workload_{}", id), cpu, ram, priority).unwrap()
}

pub fn test_node(name: &str, cpu: u32, ram: u64, cost_multiplier: u64) -> Node {
    Node::new(name.to_string(), ResourceVector::new(cpu, ram), cost_multiplier).unwrap()
}

/// The workload set used by the scheduler scenarios: mixed sizes, one extremely low priority
/// workload and one that fits no node.
pub fn mixed_workloads(base_priority: u64) -> Vec<Workload> {
    vec![
        test_workload(1, 100, 100, base_priority),
        test_workload(2, 100, 100, 1000 + base_priority),
        test_workload(3, 500, 1000, base_priority),
        test_workload(4, 1000, 1000, base_priority),
        test_workload(5, 1000, 1000, base_priority),
        test_workload(6, 100, 100, base_priority),
        test_workload(7, 1000, 1000, base_priority),
        test_workload(8, 10000, 10000, base_priority),
    ]
}

pub fn mixed_nodes() -> Vec<Node> {
    vec![
        test_node("node_0", 4000, 16000, 10),
        test_node("node_1", 200, 16000, 10),
        test_node("node_2", 16000, 16000, 10),
    ]
}
