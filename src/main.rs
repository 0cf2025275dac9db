use clap::Parser;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::info;
use std::env;
use std::rc::Rc;

use dslab_feedback_scheduler::config::SimulationConfig;
use dslab_feedback_scheduler::metrics::printer::print_metrics;
use dslab_feedback_scheduler::simulator::FeedbackSimulation;

#[derive(Parser)]
struct Args {
    #[clap(short, long)]
    config_file: std::path::PathBuf,
    /// Overrides the number of cycles from the config file.
    #[clap(long)]
    cycles: Option<u64>,
}

fn init_logger(logs_filepath: Option<&str>) {
    // log level INFO by default
    let mut env_logger_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        env_logger_builder.filter_level(log::LevelFilter::Info);
    }
    if let Some(path) = logs_filepath {
        let log_file = FileRotate::new(
            path,
            AppendCount::new(5),
            ContentLimit::Bytes(100 * 1024 * 1024),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        env_logger_builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    env_logger_builder.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_yaml = std::fs::read_to_string(&args.config_file)?;
    let mut config = serde_yaml::from_str::<SimulationConfig>(&config_yaml)?;
    if args.cycles.is_some() {
        config.cycles = args.cycles;
    }
    if config.cycles.is_none() {
        return Err("number of cycles must be set in config file or with --cycles".into());
    }

    init_logger(config.logs_filepath.as_deref());
    info!(
        "Path to config file: {:?}",
        args.config_file.canonicalize()?
    );

    let config = Rc::new(config);
    let mut simulation = FeedbackSimulation::new(config.clone())?;
    simulation.run_until_no_events();

    info!(
        "{} cycles done, {} workloads hosted, {} pending",
        simulation.cycles_run(),
        simulation.hosted_count(),
        simulation.pending_count()
    );

    if let Some(printer_config) = config.metrics_printer.as_ref() {
        print_metrics(simulation.metrics_collector.clone(), printer_config)?;
    }
    Ok(())
}
