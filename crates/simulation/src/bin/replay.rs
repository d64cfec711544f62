//! Feedview scenario replay CLI
//!
//! Replays a scripted scroll scenario through the arbiter on a virtual clock
//! and prints every change of the active view.

use anyhow::Context;
use clap::Parser;
use feedview_simulation::Scenario;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedview-replay")]
#[command(about = "Replay a scroll scenario through the active video arbiter")]
#[command(version)]
struct Cli {
    /// Scenario file (TOML)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Stop the clock at this time (defaults to one second past the last step)
    #[arg(long)]
    until_ms: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("loading {}", cli.scenario.display()))?;

    let until = cli
        .until_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| scenario.end_time() + Duration::from_secs(1));

    let mut runner = scenario.into_runner();
    runner.run_until(until);

    println!("{:>10}  {:<10}  {:<10}  reason", "at (ms)", "from", "to");
    for record in runner.history() {
        println!(
            "{:>10}  {:<10}  {:<10}  {}",
            record.at.as_millis(),
            display_view(record.previous),
            display_view(record.current),
            record.reason
        );
    }

    let stats = runner.stats();
    println!();
    println!("events processed:   {}", stats.events_processed);
    println!("sweeps:             {}", stats.sweeps);
    println!("activation changes: {}", stats.activation_changes);
    println!("final active view:  {}", display_view(runner.active_view()));

    Ok(())
}

fn display_view(view: Option<feedview_types::ViewId>) -> String {
    view.map_or_else(|| "-".to_string(), |v| v.to_string())
}
