use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, fs::File, io::Write, rc::Rc};

use crate::metrics::collector::{EstimatorWrapper, MetricsCollector};

#[derive(Debug, Default, Deserialize, PartialEq)]
pub enum OutputFormat {
    #[default]
    JSON,
    PrettyTable,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct MetricsPrinterConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: std::path::PathBuf,
}

pub fn print_metrics(
    collector: Rc<RefCell<MetricsCollector>>,
    config: &MetricsPrinterConfig,
) -> std::io::Result<()> {
    let mut metrics_file = File::create(&config.output_file)?;
    let metrics = collector.borrow();
    match config.format {
        OutputFormat::PrettyTable => write_metrics_as_pretty_table(&metrics, &mut metrics_file),
        OutputFormat::JSON => write_metrics_as_json(&metrics, &mut metrics_file),
    }
}

fn stats_row(table: &mut Table, name: &str, stats: &EstimatorWrapper) {
    table.add_row(row![
        name,
        stats.min(),
        stats.max(),
        stats.mean(),
        stats.population_variance()
    ]);
}

pub fn write_metrics_as_pretty_table<W: Write>(
    metrics: &MetricsCollector,
    out: &mut W,
) -> std::io::Result<()> {
    let mut aggregated_table = Table::new();
    aggregated_table.add_row(row!["Metric", "Count"]);
    aggregated_table.add_row(row!["Total workloads", metrics.total_workloads]);
    aggregated_table.add_row(row!["Total nodes", metrics.total_nodes]);
    aggregated_table.add_row(row!["Cycles", metrics.cycles]);
    aggregated_table.add_row(row!["Workloads placed", metrics.workloads_placed]);
    aggregated_table.add_row(row!["Workloads evicted", metrics.workloads_evicted]);
    aggregated_table.add_row(row!["Workloads unscheduled", metrics.workloads_unscheduled]);

    let mut stats_table = Table::new();
    stats_table.add_row(row!["Metric", "Min", "Max", "Mean", "Variance"]);
    stats_row(
        &mut stats_table,
        "Pending after placement",
        &metrics.pending_after_placement_stats,
    );
    stats_row(&mut stats_table, "Cost per workload", &metrics.cost_stats);
    stats_row(
        &mut stats_table,
        "Priority at eviction",
        &metrics.eviction_priority_stats,
    );

    aggregated_table.print(out)?;
    stats_table.print(out)?;
    Ok(())
}

#[derive(Serialize)]
struct MetricsJSON {
    counters: Counters,
    stats: Stats,
}

#[derive(Serialize)]
struct Counters {
    total_workloads: u64,
    total_nodes: u64,
    cycles: u64,
    workloads_placed: u64,
    workloads_evicted: u64,
    workloads_unscheduled: u64,
}

#[derive(Serialize)]
struct Stats {
    pending_after_placement: EstimatorStats,
    cost_per_workload: EstimatorStats,
    priority_at_eviction: EstimatorStats,
}

#[derive(Serialize)]
struct EstimatorStats {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

impl From<&EstimatorWrapper> for EstimatorStats {
    fn from(stats: &EstimatorWrapper) -> Self {
        Self {
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            variance: stats.population_variance(),
        }
    }
}

pub fn write_metrics_as_json<W: Write>(
    metrics: &MetricsCollector,
    out: &mut W,
) -> std::io::Result<()> {
    let metrics = MetricsJSON {
        counters: Counters {
            total_workloads: metrics.total_workloads,
            total_nodes: metrics.total_nodes,
            cycles: metrics.cycles,
            workloads_placed: metrics.workloads_placed,
            workloads_evicted: metrics.workloads_evicted,
            workloads_unscheduled: metrics.workloads_unscheduled,
        },
        stats: Stats {
            pending_after_placement: (&metrics.pending_after_placement_stats).into(),
            cost_per_workload: (&metrics.cost_stats).into(),
            priority_at_eviction: (&metrics.eviction_priority_stats).into(),
        },
    };

    let serialized_json = serde_json::to_string_pretty(&metrics)?;
    out.write_all(serialized_json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{write_metrics_as_json, write_metrics_as_pretty_table};
    use crate::metrics::collector::MetricsCollector;

    fn collector() -> MetricsCollector {
        let mut metrics = MetricsCollector::new();
        metrics.total_workloads = 30;
        metrics.cycles = 2;
        metrics.workloads_placed = 30;
        metrics.cost_stats.add(156.0);
        metrics.cost_stats.add(62.0);
        metrics
    }

    #[test]
    fn test_json_output() {
        let mut out: Vec<u8> = vec![];
        write_metrics_as_json(&collector(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(Some(30), value["counters"]["total_workloads"].as_u64());
        assert_eq!(Some(2), value["counters"]["cycles"].as_u64());
        assert_eq!(Some(156.0), value["stats"]["cost_per_workload"]["max"].as_f64());
        assert_eq!(Some(109.0), value["stats"]["cost_per_workload"]["mean"].as_f64());
    }

    #[test]
    fn test_pretty_table_output() {
        let mut out: Vec<u8> = vec![];
        write_metrics_as_pretty_table(&collector(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Workloads placed"));
        assert!(text.contains("Cost per workload"));
    }
}
