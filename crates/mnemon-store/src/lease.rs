//! Per-namespace writer leases for reconciliation passes.

use crate::namespace::Namespace;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out exclusive per-namespace writer leases.
///
/// A reconciliation pass holds the lease for its full
/// read-extract-merge-write cycle, so two passes against the same
/// namespace can never interleave their reads and writes. Passes on
/// different namespaces proceed independently.
#[derive(Default)]
pub struct NamespaceLeases {
    locks: Mutex<HashMap<Namespace, Arc<AsyncMutex<()>>>>,
}

impl NamespaceLeases {
    /// Create an empty lease map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the writer lease for a namespace, waiting if it is held.
    pub async fn acquire(&self, namespace: &Namespace) -> NamespaceLease {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(namespace.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        debug!("acquired namespace lease (namespace={namespace})");
        NamespaceLease { _guard: guard }
    }
}

/// Exclusive writer lease for one namespace; released on drop.
pub struct NamespaceLease {
    _guard: OwnedMutexGuard<()>,
}

#[cfg(test)]
mod tests {
    use super::NamespaceLeases;
    use crate::namespace::Namespace;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn lease_serializes_same_namespace_holders() {
        let leases = Arc::new(NamespaceLeases::new());
        let ns = Namespace::todo("general", "user-1");
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let leases = leases.clone();
            let ns = ns.clone();
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _lease = leases.acquire(&ns).await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.expect("join");
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_namespaces_do_not_block_each_other() {
        let leases = NamespaceLeases::new();
        let first = leases.acquire(&Namespace::todo("general", "alice")).await;
        // Must not deadlock while the first lease is still held.
        let _second = leases.acquire(&Namespace::todo("general", "bob")).await;
        drop(first);
    }
}
