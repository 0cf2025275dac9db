//! Config fields definitions for the feedback scheduler simulation

use serde::Deserialize;

use crate::metrics::printer::MetricsPrinterConfig;

#[derive(Debug, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub sim_name: String,
    pub seed: u64,
    #[serde(default = "cycle_interval_default")]
    pub cycle_interval: f64, // in seconds
    /// Number of cycles to run. If not set the simulation runs until stopped by the caller.
    pub cycles: Option<u64>,
    /// Added to the priority of every pending workload on each cycle. Must not be positive.
    #[serde(default = "priority_recovery_default")]
    pub priority_recovery: i64,
    /// Hosted workloads with priority strictly above this value are evicted.
    #[serde(default = "expiration_threshold_default")]
    pub expiration_threshold: u64,
    /// If not set default output of logs is stdout/stderr
    pub logs_filepath: Option<String>,
    #[serde(default = "workloads_default")]
    pub workloads: Vec<WorkloadGroup>,
    pub random_workloads: Option<RandomWorkloads>,
    #[serde(default = "nodes_default")]
    pub nodes: Vec<NodeGroup>,
    pub metrics_printer: Option<MetricsPrinterConfig>,
}

fn cycle_interval_default() -> f64 {
    5.0
}
fn priority_recovery_default() -> i64 {
    -300
}
fn expiration_threshold_default() -> u64 {
    500
}
fn workloads_default() -> Vec<WorkloadGroup> {
    vec![WorkloadGroup {
        workload_count: Some(30),
        workload_template: WorkloadTemplate {
            name: String::new(),
            cpu: 1000,
            ram: 1000,
            priority: 0,
        },
    }]
}
fn nodes_default() -> Vec<NodeGroup> {
    vec![NodeGroup {
        node_count: Some(3),
        node_template: NodeTemplate {
            name: String::new(),
            cpu: 8000,
            ram: 16000,
            cost_multiplier: 10,
        },
    }]
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sim_name: "feedback_scheduler".to_string(),
            seed: 123,
            cycle_interval: cycle_interval_default(),
            cycles: None,
            priority_recovery: priority_recovery_default(),
            expiration_threshold: expiration_threshold_default(),
            logs_filepath: None,
            workloads: workloads_default(),
            random_workloads: None,
            nodes: nodes_default(),
            metrics_printer: None,
        }
    }
}

#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct WorkloadTemplate {
    #[serde(default)]
    pub name: String,
    pub cpu: u32, // in millicores
    pub ram: u64, // in bytes
    #[serde(default)]
    pub priority: u64,
}

#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct WorkloadGroup {
    // Workloads are named <name>_<idx> when the template has a name, <idx> otherwise.
    pub workload_count: Option<u64>,
    pub workload_template: WorkloadTemplate,
}

/// Workloads with uniformly random requests drawn from the simulation random generator.
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct RandomWorkloads {
    pub count: u64,
    pub max_cpu: u32,
    pub max_ram: u64,
}

#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct NodeTemplate {
    #[serde(default)]
    pub name: String,
    pub cpu: u32, // in millicores
    pub ram: u64, // in bytes
    pub cost_multiplier: u64,
}

#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct NodeGroup {
    // If node count is not none and template has name, then it's taken as a prefix of all nodes
    // in a group.
    // If node count is none or 1 and template has name, then it's a single node and its name is set
    // to template name.
    // If template has got no name, nodes are named from the NATO alphabet.
    pub node_count: Option<u64>,
    pub node_template: NodeTemplate,
}
