//! Per-document debounce gate
//!
//! A completion request is admitted only once its document has been idle for
//! the configured delay. Scheduling a new request for the same document
//! supersedes the pending one; requests for different documents never
//! interfere. Invariant: at most one pending waiter per document key.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Outcome of waiting at the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The idle delay elapsed with no newer request for this document
    Ready,
    /// A newer request for the same document arrived during the delay
    Superseded,
}

#[derive(Debug)]
struct PendingWaiter {
    generation: u64,
    cancel: watch::Sender<bool>,
}

/// Debounce gate keyed by document URI
#[derive(Debug)]
pub struct DebounceGate {
    delay: Duration,
    generations: AtomicU64,
    pending: DashMap<String, PendingWaiter>,
}

impl DebounceGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: AtomicU64::new(0),
            pending: DashMap::new(),
        }
    }

    /// Wait out the idle delay for `key`.
    ///
    /// Resolves [`Admission::Ready`] if the delay elapses without a newer
    /// `admit` call for the same key, [`Admission::Superseded`] otherwise.
    pub async fn admit(&self, key: &str) -> Admission {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = watch::channel(false);

        if let Some(previous) = self.pending.insert(
            key.to_string(),
            PendingWaiter {
                generation,
                cancel: tx,
            },
        ) {
            let _ = previous.cancel.send(true);
        }

        tokio::select! {
            _ = sleep(self.delay) => {}
            _ = rx.changed() => return Admission::Superseded,
        }

        // Only remove our own entry; a newer waiter may have replaced it
        self.pending
            .remove_if(key, |_, waiter| waiter.generation == generation);

        Admission::Ready
    }

    /// Abort the pending waiter for `key`, if any (used on document close)
    pub fn cancel(&self, key: &str) {
        if let Some((_, waiter)) = self.pending.remove(key) {
            let _ = waiter.cancel.send(true);
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of documents with a waiter currently pending
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_DELAY: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_single_admit_is_ready() {
        let gate = DebounceGate::new(TEST_DELAY);
        assert_eq!(gate.admit("file:///a.rs").await, Admission::Ready);
        assert_eq!(gate.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_newer_admit_supersedes_pending() {
        let gate = std::sync::Arc::new(DebounceGate::new(TEST_DELAY));

        let first = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.admit("file:///a.rs").await })
        };
        // Let the first waiter get scheduled before superseding it
        sleep(Duration::from_millis(10)).await;

        let second = gate.admit("file:///a.rs").await;

        assert_eq!(first.await.unwrap(), Admission::Superseded);
        assert_eq!(second, Admission::Ready);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_interfere() {
        let gate = std::sync::Arc::new(DebounceGate::new(TEST_DELAY));

        let a = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.admit("file:///a.rs").await })
        };
        sleep(Duration::from_millis(10)).await;
        let b = gate.admit("file:///b.rs").await;

        assert_eq!(a.await.unwrap(), Admission::Ready);
        assert_eq!(b, Admission::Ready);
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_waiter() {
        let gate = std::sync::Arc::new(DebounceGate::new(TEST_DELAY));

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.admit("file:///a.rs").await })
        };
        sleep(Duration::from_millis(10)).await;
        gate.cancel("file:///a.rs");

        assert_eq!(waiter.await.unwrap(), Admission::Superseded);
        assert_eq!(gate.pending_count(), 0);
    }

    #[test]
    fn test_delay_accessor() {
        let gate = DebounceGate::new(Duration::from_millis(3000));
        assert_eq!(gate.delay(), Duration::from_millis(3000));
    }
}
