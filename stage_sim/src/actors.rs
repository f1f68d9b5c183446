//! Built-in actors.

use crate::adwin::Adwin;
use stage_env::{Action, Actor, ActorError, Line};
use std::time::Duration;

/// Feeds each observation `x` into an ADWIN detector.
pub struct AdwinActor {
    adwin: Adwin,
}

/// Snapshot of the detector after one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct AdwinAction {
    pub x: f64,
    pub mu: f64,
    pub sum: f64,
    pub size: usize,
}

impl AdwinActor {
    /// Confidence used by the built-in actor.
    pub const DELTA: f64 = 0.01;

    pub fn new(_seed: u64) -> Self {
        Self {
            adwin: Adwin::new(Self::DELTA),
        }
    }
}

impl Actor for AdwinActor {
    type Action = AdwinAction;

    fn act(&mut self, line: Line) -> Result<AdwinAction, ActorError> {
        let mu = line.get_f64("mu")?;
        let x = line.get_f64("x")?;
        self.adwin.add(x);

        Ok(AdwinAction {
            x,
            mu,
            sum: self.adwin.sum(),
            size: self.adwin.size(),
        })
    }
}

impl Action for AdwinAction {
    /// CSV row: `x,mu,sum,size`.
    fn render(&self) -> String {
        format!("{:.6},{:.6},{:.6},{}\n", self.x, self.mu, self.sum, self.size)
    }
}

/// Sleeps for the step's `sleep_ms` and produces no output.
pub struct SleepActor;

impl SleepActor {
    pub fn new(_seed: u64) -> Self {
        Self
    }
}

impl Actor for SleepActor {
    type Action = ();

    fn act(&mut self, line: Line) -> Result<(), ActorError> {
        let ms = line.get_u64("sleep_ms")?;
        std::thread::sleep(Duration::from_millis(ms));
        Ok(())
    }
}
