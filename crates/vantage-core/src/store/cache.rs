// ── Atomic snapshot holder ──

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tracing::error;

use super::snapshot::Snapshot;

/// Holds the current snapshot behind an atomic pointer.
///
/// Readers never block and never see a partially built snapshot: they
/// get whichever `Arc<Snapshot>` was current when they called `load`.
pub struct SnapshotCache {
    current: ArcSwap<Snapshot>,
    generation: watch::Sender<u64>,
}

impl SnapshotCache {
    pub(crate) fn new(initial: Snapshot) -> Self {
        let (generation, _) = watch::channel(initial.generation());
        Self {
            current: ArcSwap::from_pointee(initial),
            generation,
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the current snapshot.
    ///
    /// Returns `false` (and keeps the current one) if `next` does not
    /// strictly follow the current generation.
    pub(crate) fn publish(&self, next: Snapshot) -> bool {
        let current = self.current.load().generation();
        if next.generation() <= current {
            error!(
                current,
                rejected = next.generation(),
                "refusing to publish a non-increasing snapshot generation"
            );
            debug_assert!(false, "snapshot generation must strictly increase");
            return false;
        }

        let generation = next.generation();
        self.current.store(Arc::new(next));
        self.generation.send_replace(generation);
        true
    }

    /// Watch the generation number of the published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("generation", &self.current.load().generation())
            .finish_non_exhaustive()
    }
}
