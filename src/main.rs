use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use HandoffQueueMini::core::buildcore::{HandoffConfig, HandoffSystem};
use HandoffQueueMini::core::config::DEFAULT_ITEM_COUNT;
use HandoffQueueMini::core::log::append_logs;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Hand a run of integers from a producer thread to a consumer thread
#[derive(Debug, Parser)]
#[command(name = "handoff", version)]
struct Args {
    /// Number of items to produce
    #[arg(long = "items", env = "HANDOFF_ITEMS", default_value_t = DEFAULT_ITEM_COUNT)]
    items: u64,

    /// Fail if the consumer waits longer than this many milliseconds
    #[arg(long = "stall-timeout-ms")]
    stall_timeout_ms: Option<u64>,

    /// Append the run report (and per-drain entries) to this NDJSON file
    #[arg(long = "report")]
    report: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long = "log-level", default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> std::result::Result<(), BoxedError> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = HandoffConfig::default()
        .with_item_count(args.items)
        .with_batch_recording(args.report.is_some());
    if let Some(ms) = args.stall_timeout_ms {
        config = config.with_stall_timeout(Duration::from_millis(ms));
    }

    let outcome = HandoffSystem::new(config).run()?;

    if let Some(path) = &args.report {
        append_logs(std::slice::from_ref(&outcome.report), path)?;
        if let Some(drains) = &outcome.drain_log {
            append_logs(drains.entries(), path)?;
        }
    }

    println!("{}", outcome.report.summary_line());
    Ok(())
}
