use dslab_feedback_scheduler::core::node::Node;
use dslab_feedback_scheduler::core::scheduler::scheduler::Scheduler;

pub fn check_nodes_within_limits(nodes: &[Node]) {
    for node in nodes.iter() {
        assert!(
            node.limit().dominates(&node.used()),
            "node {:?} hosts more than its limit",
            node.name()
        );
    }
}

pub fn hosted_count(nodes: &[Node]) -> usize {
    nodes.iter().map(|n| n.workload_count()).sum()
}

/// Every workload is either pending or hosted on exactly one node.
pub fn check_workloads_conserved(total: usize, scheduler: &Scheduler, nodes: &[Node]) {
    assert_eq!(total, scheduler.pending_count() + hosted_count(nodes));
    for workload in scheduler.pending_workloads() {
        assert!(nodes.iter().all(|n| !n.is_hosting(&workload.id)));
    }
    for node in nodes.iter() {
        for workload in node.workloads() {
            let hosts = nodes.iter().filter(|n| n.is_hosting(&workload.id)).count();
            assert_eq!(1, hosts);
        }
    }
}
