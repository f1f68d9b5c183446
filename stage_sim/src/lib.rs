//! Stage: bounded-concurrency simulation runner
//!
//! Drives a [`Scenario`](stage_env::Scenario) through an
//! [`Actor`](stage_env::Actor) across many independent iterations, each with
//! its own seeds and its own log file.
//!
//! # Reproducibility
//!
//! All per-iteration seeds come from one root seed, drawn in dispatch order.
//! Iteration `i` of a run therefore always sees the same actor and scenario
//! seeds, whatever the concurrency limit, and its log file name records
//! them so it can be replayed on its own.
//!
//! # Architecture
//!
//! ```text
//!  root seed ──► SeedDeriver ──► admission gate (Semaphore, N permits)
//!                                        │
//!                      ┌─────────────────┼─────────────────┐
//!                      ▼                 ▼                 ▼
//!                 worker #0         worker #1   ...   worker #N-1
//!           actor+scenario+sink  actor+scenario+sink
//!                      │                 │                 │
//!                      └──── first error slot / progress relay ──► callback
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use stage_sim::{no_op_progress, AdwinActor, DriftScenario, Stage, StageConfig};
//!
//! let stage = Stage::new(StageConfig::new("example_log").with_seed(1));
//! stage
//!     .run(10, AdwinActor::new, DriftScenario::abrupt, no_op_progress())
//!     .await?;
//! ```

pub mod actors;
pub mod adwin;
mod config;
mod error;
pub mod executor;
pub mod layout;
mod progress;
mod runner;
pub mod scenarios;
mod seeds;
mod sink;

pub use actors::{AdwinAction, AdwinActor, SleepActor};
pub use adwin::Adwin;
pub use config::StageConfig;
pub use error::{IterationError, StageError};
pub use progress::{no_op_progress, ProgressFn, ProgressNotifier, ProgressRelay};
pub use runner::{RunSummary, Stage};
pub use scenarios::{DriftProfile, DriftScenario, ScenarioId, SleepScenario};
pub use seeds::{SeedDeriver, SeedPair};
pub use sink::LogSink;
