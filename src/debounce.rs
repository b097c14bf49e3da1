use log::debug;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Collapses bursts of calls into the last one
///
/// Each [`call`](Debouncer::call) schedules its action to run once `delay`
/// has passed. If another call arrives first, the earlier action is skipped.
/// An action that has already started runs to completion regardless of later
/// calls.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` and supersede whatever was scheduled before.
    ///
    /// The returned handle resolves to `true` if the action ran and `false`
    /// if a later call superseded it. Must be called from within a tokio
    /// runtime.
    pub fn call<F, Fut>(&self, action: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            sleep(delay).await;
            if generation.load(Ordering::SeqCst) != scheduled {
                debug!("Debounced call #{} superseded", scheduled);
                return false;
            }
            action().await;
            true
        })
    }
}
