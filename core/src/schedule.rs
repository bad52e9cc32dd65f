use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// A periodic job with an explicit cancellation token.
///
/// Ticks stop as soon as `cancel` is called, and dropping the handle
/// cancels too, so a tick can never fire into an owner that has already
/// been torn down.
pub struct PeriodicTask {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawns `tick` on the ambient tokio runtime, firing every `period`.
    /// The first tick lands one period after spawn, not immediately.
    pub fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut timer = time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // tokio intervals fire their first tick immediately.
            timer.tick().await;
            loop {
                tokio::select! {
                    _ = timer.tick() => tick(),
                    changed = cancel_rx.changed() => {
                        if changed.is_err() || *cancel_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });
        Self { cancel_tx, handle }
    }

    /// Stops future ticks. Idempotent.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticks_accumulate_then_stop_after_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let task = PeriodicTask::spawn(Duration::from_millis(10), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(80)).await;
        task.cancel();
        time::sleep(Duration::from_millis(30)).await;

        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 1);

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels_the_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let task = PeriodicTask::spawn(Duration::from_millis(10), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(35)).await;
        drop(task);
        time::sleep(Duration::from_millis(30)).await;

        let after_drop = count.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }
}
