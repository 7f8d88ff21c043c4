use std::future::Future;
use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};

/// Bounded pool of probe tasks built on a counting semaphore.
///
/// `dispatch` waits for a free permit and moves it into the spawned task, so
/// the permit is released however the task ends, panics included. `drain`
/// takes every permit at once and therefore only returns after all
/// dispatched tasks have finished; the permits are handed back right after.
pub struct ProbePool {
    sem: Arc<Semaphore>,
    size: u32,
}

impl ProbePool {
    pub fn new(size: usize) -> Self {
        let size = u32::try_from(size.max(1)).unwrap_or(u32::MAX);
        Self { sem: Arc::new(Semaphore::new(size as usize)), size }
    }

    pub async fn dispatch<F>(&self, task: F) -> Result<(), AcquireError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = self.sem.clone().acquire_owned().await?;
        tokio::spawn(async move {
            let _permit = permit;
            task.await;
        });
        Ok(())
    }

    /// Barrier: wait until no dispatched task is still running.
    pub async fn drain(&self) -> Result<(), AcquireError> {
        let _all = self.sem.acquire_many(self.size).await?;
        Ok(())
    }
}
