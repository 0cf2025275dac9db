//! Cost accrual and eviction passes over the whole node pool.

use log::{error, info};

use crate::core::node::Node;
use crate::core::workload::Workload;

/// Applies cost to every hosted workload on every node. Returns all applied costs.
pub fn apply_cost_to_all(nodes: &mut [Node]) -> Vec<u64> {
    nodes.iter_mut().flat_map(|node| node.apply_cost()).collect()
}

/// Stops every hosted workload whose priority value is strictly above `threshold_priority` and
/// returns them, in node-then-workload order, so they can be re-queued. A workload which can not
/// be stopped is skipped and the sweep goes on.
pub fn expire_above_threshold(nodes: &mut [Node], threshold_priority: u64) -> Vec<Workload> {
    let mut expired: Vec<Workload> = vec![];

    for node in nodes.iter_mut() {
        for id in node.hosted_ids_where(|w| w.priority > threshold_priority) {
            match node.stop(&id) {
                Some(workload) => {
                    info!(
                        "stopping workload {} with priority {} on node {:?}",
                        workload,
                        workload.priority,
                        node.name()
                    );
                    expired.push(workload);
                }
                None => {
                    error!(
                        "error removing workload {} from node {:?}",
                        id,
                        node.name()
                    );
                    continue;
                }
            }
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{apply_cost_to_all, expire_above_threshold};
    use crate::core::common::ResourceVector;
    use crate::core::node::Node;
    use crate::core::workload::Workload;

    fn workload(id: u128, priority: u64) -> Workload {
        Workload::with_id(Uuid::from_u128(id), format!("w{}", id), 100, 100, priority).unwrap()
    }

    fn node(name: &str) -> Node {
        Node::new(name.to_string(), ResourceVector::new(1000, 1000), 10).unwrap()
    }

    #[test]
    fn test_apply_cost_to_all_fans_out() {
        let mut nodes = vec![node("a"), node("b")];
        nodes[0].start(workload(1, 0));
        nodes[1].start(workload(2, 0));
        nodes[1].start(workload(3, 0));

        // 10 x avg(10%, 10%)
        assert_eq!(vec![100, 100, 100], apply_cost_to_all(&mut nodes));
        for node in nodes.iter() {
            assert!(node.workloads().all(|w| w.priority == 100));
        }
    }

    #[test]
    fn test_expire_only_strictly_above_threshold() {
        let mut nodes = vec![node("a")];
        nodes[0].start(workload(1, 500));
        nodes[0].start(workload(2, 501));
        nodes[0].start(workload(3, 0));

        let expired = expire_above_threshold(&mut nodes, 500);
        assert_eq!(vec![Uuid::from_u128(2)], expired.iter().map(|w| w.id).collect::<Vec<_>>());
        assert_eq!(2, nodes[0].workload_count());
    }

    #[test]
    fn test_expire_in_node_then_workload_order() {
        let mut nodes = vec![node("a"), node("b")];
        nodes[1].start(workload(1, 900));
        nodes[0].start(workload(3, 900));
        nodes[0].start(workload(2, 900));

        let expired: Vec<u128> = expire_above_threshold(&mut nodes, 10)
            .iter()
            .map(|w| w.id.as_u128())
            .collect();
        assert_eq!(vec![2, 3, 1], expired);
        assert!(nodes.iter().all(|n| n.workload_count() == 0));
    }

    #[test]
    fn test_nothing_to_expire() {
        let mut nodes = vec![node("a")];
        nodes[0].start(workload(1, 5));
        assert!(expire_above_threshold(&mut nodes, 5).is_empty());
        assert!(expire_above_threshold(&mut [], 0).is_empty());
    }
}
