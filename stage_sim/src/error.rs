//! Error types for the stage runner.

use stage_env::ActorError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a single iteration.
#[derive(Debug, Error)]
pub enum IterationError {
    /// The iteration's log file could not be created
    #[error("failed to create log file {}: {source}", path.display())]
    CreateSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a rendered action failed
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    /// Flushing or closing the log file failed
    #[error("failed to close log file {}: {source}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The actor rejected a step (steps are numbered from 1)
    #[error("actor failed at step {step}: {source}")]
    Act {
        step: u64,
        #[source]
        source: ActorError,
    },
}

/// Errors returned by [`Stage::run`](crate::Stage::run).
#[derive(Debug, Error)]
pub enum StageError {
    /// The run directory could not be created; no iteration was started
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An iteration failed
    #[error("iteration {index} failed: {source}")]
    Iteration {
        index: usize,
        #[source]
        source: IterationError,
    },

    /// An iteration's scenario or actor panicked
    #[error("iteration {index} panicked: {message}")]
    Panicked { index: usize, message: String },

    /// A worker task could not be joined
    #[error("task join failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The progress consumer thread could not be started
    #[error("failed to start progress thread: {0}")]
    ProgressThread(#[source] io::Error),

    /// The progress consumer stopped before draining (the callback panicked)
    #[error("progress callback stopped before all notifications were delivered")]
    ProgressStopped,
}

impl StageError {
    /// Index of the iteration this error belongs to, if any.
    pub fn iteration(&self) -> Option<usize> {
        match self {
            Self::Iteration { index, .. } | Self::Panicked { index, .. } => Some(*index),
            _ => None,
        }
    }
}
