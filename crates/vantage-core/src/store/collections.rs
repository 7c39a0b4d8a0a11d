// ── Per-datacenter object collections ──

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::convert;
use crate::model::{
    Aggregate, Check, Client, Event, MonitoringObject, ObjectKind, Resource, Silence, Stash,
    Subscription,
};

/// Every collection of one datacenter (or the merged view), each in the
/// order the remote returned it.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub checks: Vec<Arc<Check>>,
    pub clients: Vec<Arc<Client>>,
    pub events: Vec<Arc<Event>>,
    pub aggregates: Vec<Arc<Aggregate>>,
    pub stashes: Vec<Arc<Stash>>,
    pub silences: Vec<Arc<Silence>>,
    pub subscriptions: Vec<Arc<Subscription>>,
}

/// Raw (already converted) fetch results for one datacenter.
#[derive(Debug, Default)]
pub(crate) struct Fetched {
    pub checks: Vec<Check>,
    pub clients: Vec<Client>,
    pub events: Vec<Event>,
    pub aggregates: Vec<Aggregate>,
    pub stashes: Vec<Stash>,
    pub silences: Vec<Silence>,
}

/// Wrap items in `Arc`, dropping any whose key was already seen.
fn dedupe<T: Resource>(datacenter: &str, items: Vec<T>) -> Vec<Arc<T>> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.key().into_owned()) {
            out.push(Arc::new(item));
        } else {
            warn!(
                datacenter,
                kind = %T::KIND,
                key = %item.key(),
                "dropping duplicate object from datacenter response"
            );
        }
    }
    out
}

impl Collections {
    /// Build one datacenter's collections; the first object wins when a
    /// response repeats a key. Subscriptions are derived from the
    /// deduplicated clients and checks.
    pub(crate) fn from_fetched(datacenter: &str, fetched: Fetched) -> Self {
        let checks = dedupe(datacenter, fetched.checks);
        let clients = dedupe(datacenter, fetched.clients);
        let subscriptions = convert::subscriptions(
            datacenter,
            clients.iter().map(|c| &**c),
            checks.iter().map(|c| &**c),
        )
        .into_iter()
        .map(Arc::new)
        .collect();

        Self {
            checks,
            clients,
            events: dedupe(datacenter, fetched.events),
            aggregates: dedupe(datacenter, fetched.aggregates),
            stashes: dedupe(datacenter, fetched.stashes),
            silences: dedupe(datacenter, fetched.silences),
            subscriptions,
        }
    }

    /// Append every collection of `other` after this one's.
    pub(crate) fn extend_from(&mut self, other: &Self) {
        self.checks.extend(other.checks.iter().cloned());
        self.clients.extend(other.clients.iter().cloned());
        self.events.extend(other.events.iter().cloned());
        self.aggregates.extend(other.aggregates.iter().cloned());
        self.stashes.extend(other.stashes.iter().cloned());
        self.silences.extend(other.silences.iter().cloned());
        self.subscriptions.extend(other.subscriptions.iter().cloned());
    }

    pub fn len(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Check => self.checks.len(),
            ObjectKind::Client => self.clients.len(),
            ObjectKind::Event => self.events.len(),
            ObjectKind::Aggregate => self.aggregates.len(),
            ObjectKind::Stash => self.stashes.len(),
            ObjectKind::Silence => self.silences.len(),
            ObjectKind::Subscription => self.subscriptions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
            && self.clients.is_empty()
            && self.events.is_empty()
            && self.aggregates.is_empty()
            && self.stashes.is_empty()
            && self.silences.is_empty()
            && self.subscriptions.is_empty()
    }

    /// Every object of `kind`, in collection order.
    pub fn objects(&self, kind: ObjectKind) -> Vec<MonitoringObject> {
        fn wrap<T>(items: &[Arc<T>]) -> Vec<MonitoringObject>
        where
            Arc<T>: Into<MonitoringObject>,
        {
            items.iter().cloned().map(Into::into).collect()
        }

        match kind {
            ObjectKind::Check => wrap(&self.checks),
            ObjectKind::Client => wrap(&self.clients),
            ObjectKind::Event => wrap(&self.events),
            ObjectKind::Aggregate => wrap(&self.aggregates),
            ObjectKind::Stash => wrap(&self.stashes),
            ObjectKind::Silence => wrap(&self.silences),
            ObjectKind::Subscription => wrap(&self.subscriptions),
        }
    }

    /// Look up one object of `kind` by its key.
    pub fn get(&self, kind: ObjectKind, key: &str) -> Option<MonitoringObject> {
        fn find<T: Resource>(items: &[Arc<T>], key: &str) -> Option<MonitoringObject>
        where
            Arc<T>: Into<MonitoringObject>,
        {
            items.iter().find(|o| o.key() == key).cloned().map(Into::into)
        }

        match kind {
            ObjectKind::Check => find(&self.checks, key),
            ObjectKind::Client => find(&self.clients, key),
            ObjectKind::Event => find(&self.events, key),
            ObjectKind::Aggregate => find(&self.aggregates, key),
            ObjectKind::Stash => find(&self.stashes, key),
            ObjectKind::Silence => find(&self.silences, key),
            ObjectKind::Subscription => find(&self.subscriptions, key),
        }
    }
}
