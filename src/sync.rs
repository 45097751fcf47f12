//! Fire-and-forget pushes of the transaction list to a remote.
//!
//! The remote is simulated: it waits for a while and then reports success or failure. A push is
//! only ever issued after the local mutation has been persisted, and its outcome is logged and
//! otherwise ignored. Nothing in the store awaits it.

use crate::model::Transaction;
use crate::Result;
use anyhow::bail;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Something that accepts a full snapshot of the transaction list.
#[async_trait::async_trait]
pub trait RemoteSync: Debug + Send + Sync {
    async fn push(&self, snapshot: Vec<Transaction>) -> Result<()>;
}

/// A stand-in for a network call. Sleeps for `delay` and then succeeds, unless `fail` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedRemote {
    delay: Duration,
    fail: bool,
}

impl SimulatedRemote {
    pub fn new(delay: Duration, fail: bool) -> Self {
        Self { delay, fail }
    }
}

#[async_trait::async_trait]
impl RemoteSync for SimulatedRemote {
    async fn push(&self, snapshot: Vec<Transaction>) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            bail!(
                "The simulated remote rejected a snapshot of {} transactions",
                snapshot.len()
            );
        }
        Ok(())
    }
}

/// Dispatches snapshots to a `RemoteSync` on detached tasks.
#[derive(Debug, Clone)]
pub struct Syncer {
    remote: Arc<dyn RemoteSync>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Syncer {
    pub fn new(remote: impl RemoteSync + 'static) -> Self {
        Self {
            remote: Arc::new(remote),
            pending: Arc::default(),
        }
    }

    /// Spawns a push of `snapshot` and returns immediately. Requires a tokio runtime; without one
    /// the push is skipped.
    pub fn dispatch(&self, snapshot: Vec<Transaction>) {
        let Ok(handle) = Handle::try_current() else {
            debug!("No async runtime is available, skipping the remote sync");
            return;
        };
        let remote = Arc::clone(&self.remote);
        let count = snapshot.len();
        let task = handle.spawn(async move {
            match remote.push(snapshot).await {
                Ok(()) => debug!("Remote sync of {count} transactions finished"),
                Err(e) => warn!("Remote sync failed: {e:#}"),
            }
        });
        match self.pending.lock() {
            Ok(mut pending) => {
                pending.retain(|h| !h.is_finished());
                pending.push(task);
            }
            Err(_) => warn!("Unable to track the remote sync task"),
        }
    }

    /// Waits up to `timeout` for every dispatched push to finish. Returns `false` if some were
    /// still running when the time ran out; those are left to run, or to be dropped with the
    /// runtime.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let handles: Vec<JoinHandle<()>> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return false,
        };
        if handles.is_empty() {
            return true;
        }
        let count = handles.len();
        let wait = async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("A remote sync task did not complete: {e}");
                }
            }
        };
        match tokio::time::timeout(timeout, wait).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    "Stopped waiting for {count} remote sync task(s) after {}ms",
                    timeout.as_millis()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use crate::test::{tx, RecordingRemote};
    use std::time::Instant;

    #[tokio::test]
    async fn test_simulated_remote_outcomes() {
        let ok = SimulatedRemote::new(Duration::from_millis(1), false);
        assert!(ok.push(vec![]).await.is_ok());

        let failing = SimulatedRemote::new(Duration::from_millis(1), true);
        let err = failing.push(vec![]).await.unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }

    #[tokio::test]
    async fn test_dispatch_then_drain() {
        let remote = RecordingRemote::default();
        let syncer = Syncer::new(remote.clone());
        syncer.dispatch(vec![tx(Kind::Income, "1", "Salary", "2024-01-01")]);
        syncer.dispatch(vec![]);
        assert!(syncer.drain(Duration::from_secs(5)).await);
        let mut received = remote.received.lock().unwrap().clone();
        received.sort();
        assert_eq!(received, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_dispatch_does_not_wait() {
        let syncer = Syncer::new(SimulatedRemote::new(Duration::from_secs(30), false));
        let start = Instant::now();
        syncer.dispatch(vec![]);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!syncer.drain(Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_failed_push_is_contained() {
        let syncer = Syncer::new(SimulatedRemote::new(Duration::ZERO, true));
        syncer.dispatch(vec![]);
        assert!(syncer.drain(Duration::from_secs(5)).await);
    }

    #[test]
    fn test_dispatch_without_runtime() {
        let remote = RecordingRemote::default();
        let syncer = Syncer::new(remote.clone());
        syncer.dispatch(vec![]);
        assert!(remote.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drain_with_nothing_pending() {
        let syncer = Syncer::new(RecordingRemote::default());
        assert!(syncer.drain(Duration::from_millis(1)).await);
    }
}
