//! Stage runner - executes many seeded iterations with bounded concurrency.
//!
//! Each iteration gets a fresh actor and scenario built from its own pair of
//! seeds, runs on a blocking worker thread, and writes to its own log file.
//! Admission is gated by a semaphore; the first failing iteration stops any
//! further admissions while already admitted iterations run to completion.

use crate::config::StageConfig;
use crate::error::StageError;
use crate::executor::run_with_log_file;
use crate::layout::{ensure_dir, run_dir_name};
use crate::progress::{ProgressFn, ProgressRelay};
use crate::seeds::SeedDeriver;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use stage_env::{Actor, Scenario};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Directory holding this run's log files
    pub run_dir: PathBuf,

    /// Root seed
    pub seed: u64,

    /// Iterations executed
    pub iterations: usize,

    /// Concurrency limit in effect
    pub concurrency: usize,

    /// Wall-clock duration in seconds
    pub elapsed_secs: f64,
}

/// First-error-wins slot shared by all workers of a run.
#[derive(Default)]
struct FirstFailure {
    tripped: AtomicBool,
    slot: Mutex<Option<StageError>>,
}

impl FirstFailure {
    /// Records `err` unless an earlier error already won; later ones are dropped.
    fn record(&self, err: StageError) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("Dropping error after first failure: {}", err);
            return;
        }
        warn!("Run failed: {}", err);
        *slot = Some(err);
        self.tripped.store(true, Ordering::Release);
    }

    fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    fn take(&self) -> Option<StageError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Runs seeded iterations of an actor/scenario pair.
pub struct Stage {
    config: StageConfig,

    /// Start of the run; names the run directory
    start_at: NaiveDateTime,
}

impl Stage {
    /// Creates a stage stamped with the current local time.
    pub fn new(config: StageConfig) -> Self {
        Self {
            config,
            start_at: Local::now().naive_local(),
        }
    }

    /// Overrides the start timestamp.
    pub fn with_start_at(mut self, start_at: NaiveDateTime) -> Self {
        self.start_at = start_at;
        self
    }

    /// Directory this run writes into: `<out_dir>/<timestamp>-<seed>`.
    pub fn run_dir(&self) -> PathBuf {
        self.config
            .out_dir
            .join(run_dir_name(self.start_at, self.config.seed))
    }

    /// Creates the run directory if needed and returns it.
    pub fn ensure_out_dir(&self) -> Result<PathBuf, StageError> {
        let path = self.run_dir();
        ensure_dir(&path).map_err(|source| StageError::OutputDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Runs `iterations` iterations and returns the first error, if any.
    ///
    /// Seeds are drawn in index order before admission, so iteration `i`
    /// always receives the same seeds for a given root seed. `progress` is
    /// called once per admitted iteration from a relay thread, and every call
    /// has happened by the time this returns.
    pub async fn run<A, S, FA, FS>(
        &self,
        iterations: usize,
        new_actor: FA,
        new_scenario: FS,
        progress: ProgressFn,
    ) -> Result<RunSummary, StageError>
    where
        A: Actor + 'static,
        S: Scenario + 'static,
        FA: Fn(u64) -> A + Send + Sync + 'static,
        FS: Fn(u64) -> S + Send + Sync + 'static,
    {
        let run_dir = self.ensure_out_dir()?;
        let concurrency = self.config.effective_concurrency();
        info!(
            "Starting run: {} iterations (seed={}, concurrency={}) -> {}",
            iterations,
            self.config.seed,
            concurrency,
            run_dir.display()
        );

        let started = Instant::now();
        let gate = Arc::new(Semaphore::new(concurrency));
        let failure = Arc::new(FirstFailure::default());
        let new_actor = Arc::new(new_actor);
        let new_scenario = Arc::new(new_scenario);
        let relay = ProgressRelay::spawn(progress, self.config.progress_capacity)?;

        let mut seeds = SeedDeriver::new(self.config.seed);
        let mut workers = JoinSet::new();

        for index in 0..iterations {
            let pair = seeds.next_pair();
            let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                break;
            };
            if failure.is_tripped() {
                info!("Skipping remaining {} iterations after failure", iterations - index);
                break;
            }

            let new_actor = Arc::clone(&new_actor);
            let new_scenario = Arc::clone(&new_scenario);
            let failure = Arc::clone(&failure);
            let notifier = relay.notifier();
            let run_dir = run_dir.clone();

            workers.spawn_blocking(move || {
                let _permit = permit;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut actor = (*new_actor)(pair.actor);
                    let mut scenario = (*new_scenario)(pair.scenario);
                    run_with_log_file(&mut actor, &mut scenario, &run_dir, iterations, index, pair)
                }));

                match outcome {
                    Ok(Ok(path)) => debug!("Iteration {} done: {}", index, path.display()),
                    Ok(Err(source)) => failure.record(StageError::Iteration { index, source }),
                    Err(payload) => failure.record(StageError::Panicked {
                        index,
                        message: panic_message(payload.as_ref()),
                    }),
                }
                notifier.notify(index);
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                failure.record(StageError::Join(err));
            }
        }
        let drained = relay.finish().await;

        if let Some(err) = failure.take() {
            return Err(err);
        }
        let delivered = drained?;
        debug!("Delivered {} progress notifications", delivered);

        let elapsed_secs = started.elapsed().as_secs_f64();
        info!("Run finished: {} iterations in {:.2}s", iterations, elapsed_secs);

        Ok(RunSummary {
            run_dir,
            seed: self.config.seed,
            iterations,
            concurrency,
            elapsed_secs,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
