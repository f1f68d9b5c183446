//! Iteration executor: drives one scenario through one actor.

use crate::error::IterationError;
use crate::seeds::SeedPair;
use crate::sink::LogSink;
use stage_env::{Action, Actor, Scenario};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Runs `scenario` to exhaustion against `actor`, appending each rendered
/// action to `out`.
///
/// Stops at the first actor or write error; whatever was already written
/// stays in `out`. Returns the number of steps completed.
pub fn run_iteration<A, S, W>(
    actor: &mut A,
    scenario: &mut S,
    out: &mut W,
) -> Result<u64, IterationError>
where
    A: Actor + ?Sized,
    S: Scenario + ?Sized,
    W: Write + ?Sized,
{
    let mut step = 0u64;
    while scenario.scan() {
        step += 1;
        let action = actor
            .act(scenario.line())
            .map_err(|source| IterationError::Act { step, source })?;
        out.write_all(action.render().as_bytes())
            .map_err(IterationError::Write)?;
    }
    Ok(step)
}

/// Runs one iteration writing into its own log file under `run_dir`.
///
/// The log file is flushed and closed whether the iteration succeeds or not.
/// An iteration error takes precedence over a close error.
pub fn run_with_log_file<A, S>(
    actor: &mut A,
    scenario: &mut S,
    run_dir: &Path,
    total: usize,
    index: usize,
    seeds: SeedPair,
) -> Result<PathBuf, IterationError>
where
    A: Actor + ?Sized,
    S: Scenario + ?Sized,
{
    let mut sink = LogSink::create(run_dir, index, total, seeds)?;
    let outcome = run_iteration(actor, scenario, &mut sink);
    let closed = sink.finish();
    outcome?;
    closed
}
