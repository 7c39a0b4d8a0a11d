// ── API-to-domain type conversions ──
//
// Bridges raw `vantage_api` wire types into datacenter-tagged
// `vantage_core::model` types. The wire format never names its own
// datacenter, so every conversion takes the owning datacenter's name.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use vantage_api::models::{RawAggregate, RawCheck, RawClient, RawEvent, RawSilence, RawStash};

use crate::model::{Aggregate, Check, Client, Event, Severity, Silence, Stash, Subscription};

/// Convert an optional epoch-seconds timestamp to `DateTime<Utc>`.
fn epoch_to_datetime(epoch: Option<i64>) -> Option<DateTime<Utc>> {
    epoch.and_then(|ts| DateTime::from_timestamp(ts, 0))
}

pub(crate) fn check(datacenter: &str, raw: RawCheck) -> Check {
    Check {
        datacenter: datacenter.to_owned(),
        name: raw.name,
        command: raw.command,
        subscribers: raw.subscribers,
        interval: raw.interval,
        standalone: raw.standalone,
        extra: raw.extra,
    }
}

pub(crate) fn client(datacenter: &str, raw: RawClient) -> Client {
    Client {
        datacenter: datacenter.to_owned(),
        name: raw.name,
        address: raw.address,
        subscriptions: raw.subscriptions,
        version: raw.version,
        last_seen: epoch_to_datetime(raw.timestamp),
        extra: raw.extra,
    }
}

pub(crate) fn event(datacenter: &str, raw: RawEvent) -> Event {
    Event {
        datacenter: datacenter.to_owned(),
        id: raw.id,
        client: raw.client.name,
        check: raw.check.name,
        severity: Severity::from(raw.check.status),
        output: raw.check.output,
        occurrences: raw.occurrences,
        action: raw.action,
        silenced: raw.silenced,
        timestamp: epoch_to_datetime(raw.timestamp),
        client_subscriptions: raw.client.subscriptions,
        check_subscribers: raw.check.subscribers,
        extra: raw.extra,
    }
}

pub(crate) fn aggregate(datacenter: &str, raw: RawAggregate) -> Aggregate {
    Aggregate {
        datacenter: datacenter.to_owned(),
        name: raw.name,
        extra: raw.extra,
    }
}

pub(crate) fn stash(datacenter: &str, raw: RawStash) -> Stash {
    Stash {
        datacenter: datacenter.to_owned(),
        path: raw.path,
        content: raw.content,
        expire: raw.expire,
    }
}

pub(crate) fn silence(datacenter: &str, raw: RawSilence) -> Silence {
    Silence {
        datacenter: datacenter.to_owned(),
        id: raw.id,
        subscription: raw.subscription,
        check: raw.check,
        reason: raw.reason,
        creator: raw.creator,
        expire: raw.expire,
        expire_on_resolve: raw.expire_on_resolve,
        extra: raw.extra,
    }
}

/// Derive the subscription list of one datacenter from its clients'
/// subscriptions and its checks' subscribers.
///
/// Result is sorted by name; `client_count` counts the clients that
/// carry each subscription (zero for check-only subscribers).
pub(crate) fn subscriptions<'a>(
    datacenter: &str,
    clients: impl IntoIterator<Item = &'a Client>,
    checks: impl IntoIterator<Item = &'a Check>,
) -> Vec<Subscription> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for c in clients {
        for name in &c.subscriptions {
            *counts.entry(name.as_str()).or_default() += 1;
        }
    }
    for check in checks {
        for name in &check.subscribers {
            counts.entry(name.as_str()).or_default();
        }
    }

    counts
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, client_count)| Subscription {
            datacenter: datacenter.to_owned(),
            name: name.to_owned(),
            client_count,
        })
        .collect()
}
