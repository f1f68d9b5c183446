//! Actor contract: the per-step responder.

use crate::{ActorError, Line};

/// A value produced by an actor for one step.
///
/// The rendered text is appended verbatim to the iteration's log; no
/// separator is added, so include a trailing newline if you want one.
pub trait Action {
    /// Deterministic textual form of this action.
    fn render(&self) -> String;
}

/// Consumes one `Line` per step and answers with an `Action`.
///
/// Returning an error ends the iteration immediately.
pub trait Actor {
    type Action: Action;

    /// Responds to a single step.
    fn act(&mut self, line: Line) -> Result<Self::Action, ActorError>;
}

impl<A: Actor + ?Sized> Actor for Box<A> {
    type Action = A::Action;

    fn act(&mut self, line: Line) -> Result<Self::Action, ActorError> {
        (**self).act(line)
    }
}

impl Action for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Action for () {
    fn render(&self) -> String {
        String::new()
    }
}
