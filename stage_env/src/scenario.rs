//! Scenario contract: the per-iteration step generator.

use crate::Line;

/// A stateful generator of steps.
///
/// The runner drives a scenario with the classic scanner protocol:
///
/// ```text
/// while scenario.scan() {
///     actor.act(scenario.line())
/// }
/// ```
///
/// A scenario may be finite or run indefinitely; the runner imposes no step
/// limit of its own.
pub trait Scenario {
    /// Advances to the next step. Returns `false` once exhausted.
    fn scan(&mut self) -> bool;

    /// Returns the data of the current step.
    ///
    /// Only meaningful right after `scan()` returned `true`.
    fn line(&self) -> Line;
}

impl<S: Scenario + ?Sized> Scenario for Box<S> {
    fn scan(&mut self) -> bool {
        (**self).scan()
    }

    fn line(&self) -> Line {
        (**self).line()
    }
}
