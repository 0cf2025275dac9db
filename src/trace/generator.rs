//! Synthetic workload and node generators. Identities and random requests are drawn from the
//! simulation random generator, so a seed fully determines the generated input.

use dslab_core::Simulation;
use uuid::Uuid;

use crate::config::{NodeGroup, RandomWorkloads, WorkloadGroup};
use crate::core::common::ResourceVector;
use crate::core::node::Node;
use crate::core::scheduler::interface::ScheduleError;
use crate::core::workload::{Workload, WorkloadId};

pub const NATO_ALPHABET: [&str; 26] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliett",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "xray", "yankee", "zulu",
];

pub fn next_workload_id(sim: &mut Simulation) -> WorkloadId {
    Uuid::from_u128(sim.gen_range(0..u128::MAX))
}

/// `n` workloads named by their index, each requesting 1 cpu and 1000 bytes.
pub fn n_workloads(sim: &mut Simulation, n: usize) -> Vec<Workload> {
    (0..n)
        .filter_map(|i| Workload::with_id(next_workload_id(sim), i.to_string(), 1000, 1000, 0).ok())
        .collect()
}

/// At most 26 nodes named from the NATO alphabet, each with 8 cpu, 16000 bytes and cost
/// multiplier 10.
pub fn n_nodes(n: usize) -> Vec<Node> {
    NATO_ALPHABET
        .iter()
        .take(n)
        .filter_map(|name| Node::new(name.to_string(), ResourceVector::new(8000, 16000), 10).ok())
        .collect()
}

pub fn random_workloads(
    sim: &mut Simulation,
    config: &RandomWorkloads,
) -> Result<Vec<Workload>, ScheduleError> {
    let mut workloads = Vec::with_capacity(config.count as usize);
    for i in 0..config.count {
        let cpu = sim.gen_range(1..=config.max_cpu.max(1));
        let ram = sim.gen_range(1..=config.max_ram.max(1));
        workloads.push(Workload::with_id(
            next_workload_id(sim),
            format!("random_{}", i),
            cpu,
            ram,
            0,
        )?);
    }
    Ok(workloads)
}

pub fn workloads_from_groups(
    sim: &mut Simulation,
    groups: &[WorkloadGroup],
) -> Result<Vec<Workload>, ScheduleError> {
    let mut workloads = vec![];
    let mut total_workloads = 0;
    for group in groups {
        let template = &group.workload_template;
        for _ in 0..group.workload_count.unwrap_or(1) {
            let name = if template.name.is_empty() {
                total_workloads.to_string()
            } else {
                format!("{}_{}", template.name, total_workloads)
            };
            workloads.push(Workload::with_id(
                next_workload_id(sim),
                name,
                template.cpu,
                template.ram,
                template.priority,
            )?);
            total_workloads += 1;
        }
    }
    Ok(workloads)
}

pub fn nodes_from_groups(groups: &[NodeGroup]) -> Result<Vec<Node>, ScheduleError> {
    let mut nodes = vec![];
    let mut total_nodes = 0;
    for group in groups {
        let template = &group.node_template;
        let limit = ResourceVector::new(template.cpu, template.ram);
        let node_count_in_group = group.node_count.unwrap_or(1);

        if node_count_in_group == 1 && !template.name.is_empty() {
            nodes.push(Node::new(
                template.name.clone(),
                limit,
                template.cost_multiplier,
            )?);
            total_nodes += 1;
            continue;
        }

        for _ in 0..node_count_in_group {
            let name = if !template.name.is_empty() {
                format!("{}_{}", template.name, total_nodes)
            } else if let Some(nato_name) = NATO_ALPHABET.get(total_nodes) {
                nato_name.to_string()
            } else {
                format!("node_{}", total_nodes)
            };
            nodes.push(Node::new(name, limit, template.cost_multiplier)?);
            total_nodes += 1;
        }
    }
    Ok(nodes)
}
