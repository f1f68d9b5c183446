//! Stage Collaborator Contracts
//!
//! This crate defines the capabilities a simulation plugs into the
//! `stage_sim` runner:
//! - **Scenario**: a stateful generator of named-value steps (`Line`s)
//! - **Actor**: consumes one `Line` per step and answers with an `Action`
//! - **Action**: anything with a deterministic textual rendering
//!
//! Every iteration of a run builds a fresh Scenario and Actor from its own
//! seeds, so implementations never share mutable state across iterations.
//!
//! # Example
//!
//! ```
//! use stage_env::{Action, Actor, ActorError, Line, Scenario};
//!
//! struct Countdown(u32);
//!
//! impl Scenario for Countdown {
//!     fn scan(&mut self) -> bool {
//!         if self.0 == 0 {
//!             return false;
//!         }
//!         self.0 -= 1;
//!         true
//!     }
//!
//!     fn line(&self) -> Line {
//!         Line::new().with("left", self.0)
//!     }
//! }
//!
//! struct Echo;
//! struct Said(u64);
//!
//! impl Action for Said {
//!     fn render(&self) -> String {
//!         self.0.to_string()
//!     }
//! }
//!
//! impl Actor for Echo {
//!     type Action = Said;
//!
//!     fn act(&mut self, line: Line) -> Result<Said, ActorError> {
//!         Ok(Said(line.get_u64("left")?))
//!     }
//! }
//!
//! let mut scenario = Countdown(3);
//! let mut actor = Echo;
//! let mut out = String::new();
//! while scenario.scan() {
//!     out.push_str(&actor.act(scenario.line()).unwrap().render());
//! }
//! assert_eq!(out, "210");
//! ```

mod actor;
mod error;
mod line;
mod scenario;

pub use actor::{Action, Actor};
pub use error::ActorError;
pub use line::Line;
pub use scenario::Scenario;
