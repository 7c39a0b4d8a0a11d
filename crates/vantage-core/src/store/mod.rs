// ── Aggregation cache ──
//
// Immutable per-cycle snapshots published through an atomic pointer.

mod cache;
mod collections;
mod snapshot;

pub use cache::SnapshotCache;
pub use collections::Collections;
pub(crate) use collections::Fetched;
pub use snapshot::{DatacenterSlice, Metrics, Snapshot};
