//! Run-scoped configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::sync::Semaphore;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Base directory; each run writes into its own subdirectory
    pub out_dir: PathBuf,

    /// Maximum concurrently running iterations (0 = available parallelism)
    pub concurrency: usize,

    /// Root seed every per-iteration seed is derived from
    pub seed: u64,

    /// Capacity of the progress relay queue
    pub progress_capacity: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("example_log"),
            concurrency: 0,
            seed: 1,
            progress_capacity: 64,
        }
    }
}

impl StageConfig {
    /// Creates a config writing under `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the root seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the progress relay capacity.
    pub fn with_progress_capacity(mut self, capacity: usize) -> Self {
        self.progress_capacity = capacity;
        self
    }

    /// Resolves the concurrency limit, substituting the host's available
    /// parallelism when unset. Never exceeds what the admission gate can hold.
    pub fn effective_concurrency(&self) -> usize {
        let limit = if self.concurrency >= 1 {
            self.concurrency
        } else {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        };
        limit.min(Semaphore::MAX_PERMITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_concurrency_is_kept() {
        let config = StageConfig::default().with_concurrency(3);
        assert_eq!(config.effective_concurrency(), 3);
    }

    #[test]
    fn test_concurrency_clamped_to_gate_capacity() {
        let config = StageConfig::default().with_concurrency(usize::MAX);
        assert_eq!(config.effective_concurrency(), Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_auto_concurrency_is_positive() {
        let config = StageConfig::default().with_concurrency(0);
        assert!(config.effective_concurrency() >= 1);
    }

    #[test]
    fn test_builders() {
        let config = StageConfig::new("/tmp/out")
            .with_seed(20)
            .with_progress_capacity(8);
        assert_eq!(config.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.seed, 20);
        assert_eq!(config.progress_capacity, 8);
        assert_eq!(config.concurrency, 0);
    }
}
