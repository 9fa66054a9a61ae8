use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Serializes cleanup passes and token refreshes.
///
/// Clones share the same lock.
#[derive(Debug, Clone, Default)]
pub struct RunLock {
    inner: Arc<Mutex<()>>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// Run `job` once no other job holds the lock
    pub async fn run<F, T>(&self, label: &str, job: F) -> T
    where
        F: Future<Output = T>,
    {
        if self.is_busy() {
            debug!("{}: waiting for the running job to finish", label);
        }
        let _guard = self.inner.lock().await;
        debug!("{}: acquired run lock", label);
        job.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_jobs_never_overlap() {
        let lock = RunLock::new();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..3 {
            let lock = lock.clone();
            let active = active.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                lock.run(&format!("job-{}", i), async {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
                .await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_returns_job_output() {
        let lock = RunLock::new();
        assert!(!lock.is_busy());
        let value = lock.run("value", async { 42 }).await;
        assert_eq!(value, 42);
        assert!(!lock.is_busy());
    }
}
