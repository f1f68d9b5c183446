//! Progress relay: decouples iteration workers from the caller's callback.
//!
//! Workers push the index of each finished iteration into a bounded queue.
//! A single consumer thread pops indices and invokes the callback, so a slow
//! callback only stalls workers once the queue is full. The consumer runs on
//! its own OS thread and never occupies a slot of the runtime's blocking pool.

use crate::error::StageError;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Callback invoked once per finished iteration with its index.
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// A callback that ignores every notification.
pub fn no_op_progress() -> ProgressFn {
    Arc::new(|_: usize| {})
}

/// Owner side of the relay.
pub struct ProgressRelay {
    tx: mpsc::Sender<usize>,

    /// Resolves with the delivered count once the consumer has drained
    drained: oneshot::Receiver<usize>,
}

/// Worker side of the relay.
#[derive(Clone)]
pub struct ProgressNotifier {
    tx: mpsc::Sender<usize>,
}

impl ProgressRelay {
    /// Starts the consumer thread.
    pub fn spawn(callback: ProgressFn, capacity: usize) -> Result<Self, StageError> {
        let (tx, mut rx) = mpsc::channel::<usize>(capacity.max(1));
        let (done_tx, drained) = oneshot::channel();

        std::thread::Builder::new()
            .name("stage-progress".to_string())
            .spawn(move || {
                let mut delivered = 0usize;
                while let Some(index) = rx.blocking_recv() {
                    callback(index);
                    delivered += 1;
                }
                let _ = done_tx.send(delivered);
            })
            .map_err(StageError::ProgressThread)?;

        Ok(Self { tx, drained })
    }

    /// Returns a handle workers use to report completions.
    pub fn notifier(&self) -> ProgressNotifier {
        ProgressNotifier {
            tx: self.tx.clone(),
        }
    }

    /// Closes the relay and waits until every queued notification has been
    /// delivered. Returns the number delivered.
    ///
    /// Completes only once all notifiers have been dropped as well.
    pub async fn finish(self) -> Result<usize, StageError> {
        drop(self.tx);
        self.drained.await.map_err(|_| StageError::ProgressStopped)
    }
}

impl ProgressNotifier {
    /// Reports a finished iteration. Blocks while the queue is full.
    ///
    /// Must not be called from async context; workers run on blocking threads.
    pub fn notify(&self, index: usize) {
        if self.tx.blocking_send(index).is_err() {
            debug!("progress relay closed, dropping notification for iteration {}", index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_relay_delivers_everything_before_finish() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressFn = Arc::new(move |i: usize| {
            std::thread::sleep(Duration::from_millis(2));
            sink.lock().unwrap().push(i);
        });

        let relay = ProgressRelay::spawn(callback, 2).unwrap();
        let notifier = relay.notifier();
        tokio::task::spawn_blocking(move || {
            for i in 0..20 {
                notifier.notify(i);
            }
        })
        .await
        .unwrap();

        let delivered = relay.finish().await.unwrap();

        assert_eq!(delivered, 20);
        assert_eq!(*seen.lock().unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_relay_with_no_notifications() {
        let relay = ProgressRelay::spawn(no_op_progress(), 4).unwrap();
        assert_eq!(relay.finish().await.unwrap(), 0);
    }

    #[test]
    fn test_relay_works_with_single_blocking_thread() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let delivered = runtime.block_on(async {
            let relay = ProgressRelay::spawn(no_op_progress(), 1).unwrap();
            let notifier = relay.notifier();
            let producer = tokio::task::spawn_blocking(move || {
                for i in 0..5 {
                    notifier.notify(i);
                }
            });
            tokio::time::timeout(Duration::from_secs(10), async {
                producer.await.unwrap();
                relay.finish().await.unwrap()
            })
            .await
            .expect("relay stalled with a single blocking thread")
        });

        assert_eq!(delivered, 5);
    }

    #[test]
    fn test_panicking_callback_reports_stopped_relay() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let result = runtime.block_on(async {
            let relay = ProgressRelay::spawn(Arc::new(|_: usize| {
                panic!("callback exploded");
            }), 1)
                .unwrap();
            let notifier = relay.notifier();
            std::thread::spawn(move || notifier.notify(0)).join().unwrap();
            relay.finish().await
        });

        assert!(matches!(result, Err(StageError::ProgressStopped)));
    }
}
