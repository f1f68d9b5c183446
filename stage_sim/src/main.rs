//! Stage Simulator CLI
//!
//! Runs a built-in scenario/actor pair for many seeded iterations.

use clap::Parser;
use stage_sim::{
    no_op_progress, AdwinActor, DriftScenario, ProgressFn, RunSummary, ScenarioId,
    SleepActor, SleepScenario, Stage, StageConfig, StageError,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Stage bounded-concurrency simulation runner
#[derive(Parser, Debug)]
#[command(name = "stage-sim")]
#[command(about = "Run seeded scenario/actor iterations in parallel", long_about = None)]
struct Args {
    /// Number of iterations
    #[arg(short, long, default_value = "1")]
    iterations: usize,

    /// Directory for result output
    #[arg(short, long, default_value = "example_log")]
    out_dir: PathBuf,

    /// Scenario to run (abrupt, gradual, sleep)
    #[arg(short = 'S', long, default_value = "abrupt")]
    scenario: String,

    /// Maximum concurrent iterations (0 = available parallelism)
    #[arg(short, long, default_value = "0")]
    concurrency: usize,

    /// Root seed for determinism
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Sleep per iteration for the sleep scenario, in milliseconds
    #[arg(long, default_value = "300")]
    sleep_ms: u64,

    /// Draw a progress bar on stderr
    #[arg(long)]
    progress: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Textual progress bar redrawn on every completed iteration.
struct ProgressBar {
    total: usize,
    done: AtomicUsize,
}

impl ProgressBar {
    const WIDTH: usize = 40;

    fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
        }
    }

    fn increment(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let filled = if self.total == 0 {
            Self::WIDTH
        } else {
            done * Self::WIDTH / self.total
        };
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r[{}{}] {}/{}",
            "#".repeat(filled),
            " ".repeat(Self::WIDTH - filled),
            done,
            self.total
        );
        let _ = stderr.flush();
    }

    fn finish(&self) {
        eprintln!();
    }
}

async fn run(
    args: &Args,
    scenario: ScenarioId,
    stage: &Stage,
    progress: ProgressFn,
) -> Result<RunSummary, StageError> {
    match scenario {
        ScenarioId::Abrupt => {
            stage
                .run(args.iterations, AdwinActor::new, DriftScenario::abrupt, progress)
                .await
        }
        ScenarioId::Gradual => {
            stage
                .run(args.iterations, AdwinActor::new, DriftScenario::gradual, progress)
                .await
        }
        ScenarioId::Sleep => {
            let sleep_ms = args.sleep_ms;
            stage
                .run(
                    args.iterations,
                    SleepActor::new,
                    move |_| SleepScenario::new(sleep_ms),
                    progress,
                )
                .await
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let scenario: ScenarioId = args.scenario.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available scenarios: abrupt, gradual, sleep");
        std::process::exit(2);
    });
    info!("Scenario: {} - {}", scenario, scenario.description());

    let config = StageConfig::new(&args.out_dir)
        .with_concurrency(args.concurrency)
        .with_seed(args.seed);
    let stage = Stage::new(config);

    let bar = args.progress.then(|| Arc::new(ProgressBar::new(args.iterations)));
    let progress: ProgressFn = match &bar {
        Some(bar) => {
            let bar = Arc::clone(bar);
            Arc::new(move |_: usize| bar.increment())
        }
        None => no_op_progress(),
    };

    let result = run(&args, scenario, &stage, progress).await;
    if let Some(bar) = &bar {
        bar.finish();
    }

    match result {
        Ok(summary) => {
            if args.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("Failed to encode summary: {}", e),
                }
            } else {
                info!(
                    "✓ {} iterations written to {} ({:.2}s)",
                    summary.iterations,
                    summary.run_dir.display(),
                    summary.elapsed_secs
                );
            }
        }
        Err(e) => {
            if args.json {
                let failure = serde_json::json!({
                    "error": e.to_string(),
                    "iteration": e.iteration(),
                });
                println!("{}", failure);
            } else {
                error!("✗ Run failed: {}", e);
            }
            std::process::exit(1);
        }
    }
}
