// ── Immutable aggregated snapshot ──
//
// One snapshot per poll cycle. Nothing in here is mutated after
// construction; readers hold an `Arc<Snapshot>` for as long as they need
// a consistent view.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::config::Registry;
use crate::model::{
    Aggregate, Check, Client, DatacenterStatus, Event, MonitoringObject, ObjectKind, Severity,
    Silence, Stash, Subscription,
};

use super::collections::Collections;

/// One datacenter's contribution to a snapshot.
#[derive(Debug, Clone)]
pub struct DatacenterSlice {
    pub status: DatacenterStatus,
    pub data: Arc<Collections>,
}

/// Counters computed once per snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub generation: u64,
    /// Object count per kind across all datacenters.
    pub objects: BTreeMap<ObjectKind, usize>,
    /// Open events per severity across all datacenters.
    pub events_by_severity: BTreeMap<Severity, usize>,
    pub silenced_events: usize,
    pub datacenters_total: usize,
    pub datacenters_reachable: usize,
}

/// An immutable, consistent view over every datacenter.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    created_at: DateTime<Utc>,
    datacenters: Vec<DatacenterSlice>,
    merged: Collections,
    metrics: Metrics,
}

impl Snapshot {
    /// Assemble a snapshot from per-datacenter slices given in registry order.
    pub(crate) fn new(
        generation: u64,
        created_at: DateTime<Utc>,
        datacenters: Vec<DatacenterSlice>,
    ) -> Self {
        let mut merged = Collections::default();
        for slice in &datacenters {
            merged.extend_from(&slice.data);
        }

        let mut events_by_severity = BTreeMap::new();
        for event in &merged.events {
            *events_by_severity.entry(event.severity).or_default() += 1;
        }

        let metrics = Metrics {
            generation,
            objects: ObjectKind::iter().map(|k| (k, merged.len(k))).collect(),
            events_by_severity,
            silenced_events: merged.events.iter().filter(|e| e.silenced).count(),
            datacenters_total: datacenters.len(),
            datacenters_reachable: datacenters.iter().filter(|s| s.status.is_reachable()).count(),
        };

        Self {
            generation,
            created_at,
            datacenters,
            merged,
            metrics,
        }
    }

    /// Generation zero: every datacenter `Unknown` and empty.
    pub(crate) fn empty(registry: &Registry) -> Self {
        let slices = registry
            .datacenters()
            .iter()
            .map(|dc| DatacenterSlice {
                status: DatacenterStatus::unknown(&dc.name),
                data: Arc::new(Collections::default()),
            })
            .collect();
        Self::new(0, Utc::now(), slices)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Per-datacenter slices in registry order.
    pub fn datacenters(&self) -> &[DatacenterSlice] {
        &self.datacenters
    }

    pub fn datacenter(&self, name: &str) -> Option<&DatacenterSlice> {
        self.datacenters.iter().find(|s| s.status.name == name)
    }

    pub fn has_datacenter(&self, name: &str) -> bool {
        self.datacenter(name).is_some()
    }

    /// Merged collection of `kind`: registry order, then remote order.
    pub fn list(&self, kind: ObjectKind) -> Vec<MonitoringObject> {
        self.merged.objects(kind)
    }

    /// Look up one object by `(kind, datacenter, key)`.
    pub fn get(&self, kind: ObjectKind, datacenter: &str, key: &str) -> Option<MonitoringObject> {
        self.datacenter(datacenter)?.data.get(kind, key)
    }

    pub fn checks(&self) -> &[Arc<Check>] {
        &self.merged.checks
    }

    pub fn clients(&self) -> &[Arc<Client>] {
        &self.merged.clients
    }

    pub fn events(&self) -> &[Arc<Event>] {
        &self.merged.events
    }

    pub fn aggregates(&self) -> &[Arc<Aggregate>] {
        &self.merged.aggregates
    }

    pub fn stashes(&self) -> &[Arc<Stash>] {
        &self.merged.stashes
    }

    pub fn silences(&self) -> &[Arc<Silence>] {
        &self.merged.silences
    }

    pub fn subscriptions(&self) -> &[Arc<Subscription>] {
        &self.merged.subscriptions
    }

    /// Status of every datacenter, keyed by name.
    pub fn health(&self) -> BTreeMap<String, DatacenterStatus> {
        self.datacenters
            .iter()
            .map(|s| (s.status.name.clone(), s.status.clone()))
            .collect()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Extra;
    use crate::store::collections::Fetched;

    fn client(dc: &str, name: &str) -> Client {
        Client {
            datacenter: dc.into(),
            name: name.into(),
            address: None,
            subscriptions: Vec::new(),
            version: None,
            last_seen: None,
            extra: Extra::new(),
        }
    }

    fn slice(dc: &str, clients: &[&str]) -> DatacenterSlice {
        DatacenterSlice {
            status: DatacenterStatus::reachable(dc, Utc::now()),
            data: Arc::new(Collections::from_fetched(
                dc,
                Fetched {
                    clients: clients.iter().map(|n| client(dc, n)).collect(),
                    ..Fetched::default()
                },
            )),
        }
    }

    #[test]
    fn merged_view_follows_registry_then_remote_order() {
        let snap = Snapshot::new(
            1,
            Utc::now(),
            vec![slice("east", &["b", "a"]), slice("west", &["c"])],
        );

        let order: Vec<_> = snap
            .clients()
            .iter()
            .map(|c| (c.datacenter.as_str(), c.name.as_str()))
            .collect();
        assert_eq!(order, vec![("east", "b"), ("east", "a"), ("west", "c")]);
        assert_eq!(snap.list(ObjectKind::Client).len(), 3);
    }

    #[test]
    fn get_is_scoped_to_the_datacenter() {
        let snap = Snapshot::new(1, Utc::now(), vec![slice("east", &["a"]), slice("west", &["a"])]);

        let hit = snap.get(ObjectKind::Client, "west", "a").unwrap();
        assert_eq!(hit.datacenter(), "west");
        assert!(snap.get(ObjectKind::Client, "north", "a").is_none());
    }

    #[test]
    fn metrics_count_every_kind() {
        let snap = Snapshot::new(4, Utc::now(), vec![slice("east", &["a", "b"])]);
        let m = snap.metrics();
        assert_eq!(m.generation, 4);
        assert_eq!(m.objects[&ObjectKind::Client], 2);
        assert_eq!(m.objects[&ObjectKind::Event], 0);
        assert_eq!(m.datacenters_reachable, 1);
    }
}
