// ── Monitoring objects ──
//
// Typed, datacenter-tagged representations of everything a datacenter
// reports. Every type carries its owning datacenter and exposes a
// kind-specific key; unknown wire fields survive in `extra`.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Extra = serde_json::Map<String, serde_json::Value>;

/// The closed set of object collections a datacenter exposes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Check,
    Client,
    Event,
    Aggregate,
    Stash,
    Silence,
    Subscription,
}

/// Common surface of every monitoring object type.
pub trait Resource {
    const KIND: ObjectKind;

    /// Name of the owning datacenter.
    fn datacenter(&self) -> &str;

    /// Kind-specific key, unique per datacenter.
    fn key(&self) -> Cow<'_, str>;
}

// ── Severity ────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl From<i32> for Severity {
    fn from(status: i32) -> Self {
        match status {
            0 => Self::Ok,
            1 => Self::Warning,
            2 => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

// ── Object types ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub datacenter: String,
    pub name: String,
    pub command: Option<String>,
    pub subscribers: Vec<String>,
    pub interval: Option<u64>,
    pub standalone: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub datacenter: String,
    pub name: String,
    pub address: Option<String>,
    pub subscriptions: Vec<String>,
    pub version: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An open (non-ok or flapping) check result for one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub datacenter: String,
    pub id: Option<String>,
    pub client: String,
    pub check: String,
    pub severity: Severity,
    pub output: Option<String>,
    pub occurrences: u64,
    pub action: Option<String>,
    pub silenced: bool,
    pub timestamp: Option<DateTime<Utc>>,
    /// Subscriptions of the client the event belongs to.
    pub client_subscriptions: Vec<String>,
    /// Subscribers of the check that produced the event.
    pub check_subscribers: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub datacenter: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stash {
    pub datacenter: String,
    pub path: String,
    pub content: Extra,
    pub expire: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Silence {
    pub datacenter: String,
    pub id: String,
    pub subscription: Option<String>,
    pub check: Option<String>,
    pub reason: Option<String>,
    pub creator: Option<String>,
    pub expire: Option<i64>,
    pub expire_on_resolve: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Silence {
    /// The id a datacenter assigns to a silence entry: `subscription:check`,
    /// with `*` standing in for whichever half is missing.
    pub fn entry_id(subscription: Option<&str>, check: Option<&str>) -> String {
        format!("{}:{}", subscription.unwrap_or("*"), check.unwrap_or("*"))
    }
}

/// A named grouping of monitored clients, derived from client and check
/// subscription lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub datacenter: String,
    pub name: String,
    pub client_count: usize,
}

// ── Resource impls ──────────────────────────────────────────────────

impl Resource for Check {
    const KIND: ObjectKind = ObjectKind::Check;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl Resource for Client {
    const KIND: ObjectKind = ObjectKind::Client;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl Resource for Event {
    const KIND: ObjectKind = ObjectKind::Event;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}/{}", self.client, self.check))
    }
}

impl Resource for Aggregate {
    const KIND: ObjectKind = ObjectKind::Aggregate;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl Resource for Stash {
    const KIND: ObjectKind = ObjectKind::Stash;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }
}

impl Resource for Silence {
    const KIND: ObjectKind = ObjectKind::Silence;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }
}

impl Resource for Subscription {
    const KIND: ObjectKind = ObjectKind::Subscription;
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

// ── MonitoringObject ────────────────────────────────────────────────

/// Any monitoring object, shared by reference with the snapshot it
/// came from. Cloning is an `Arc` bump.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MonitoringObject {
    Check(Arc<Check>),
    Client(Arc<Client>),
    Event(Arc<Event>),
    Aggregate(Arc<Aggregate>),
    Stash(Arc<Stash>),
    Silence(Arc<Silence>),
    Subscription(Arc<Subscription>),
}

impl MonitoringObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Check(_) => ObjectKind::Check,
            Self::Client(_) => ObjectKind::Client,
            Self::Event(_) => ObjectKind::Event,
            Self::Aggregate(_) => ObjectKind::Aggregate,
            Self::Stash(_) => ObjectKind::Stash,
            Self::Silence(_) => ObjectKind::Silence,
            Self::Subscription(_) => ObjectKind::Subscription,
        }
    }

    pub fn datacenter(&self) -> &str {
        match self {
            Self::Check(o) => o.datacenter(),
            Self::Client(o) => o.datacenter(),
            Self::Event(o) => o.datacenter(),
            Self::Aggregate(o) => o.datacenter(),
            Self::Stash(o) => o.datacenter(),
            Self::Silence(o) => o.datacenter(),
            Self::Subscription(o) => o.datacenter(),
        }
    }

    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Check(o) => o.key(),
            Self::Client(o) => o.key(),
            Self::Event(o) => o.key(),
            Self::Aggregate(o) => o.key(),
            Self::Stash(o) => o.key(),
            Self::Silence(o) => o.key(),
            Self::Subscription(o) => o.key(),
        }
    }
}

macro_rules! impl_from_arc {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<Arc<$variant>> for MonitoringObject {
                fn from(value: Arc<$variant>) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<$variant> for MonitoringObject {
                fn from(value: $variant) -> Self {
                    Self::$variant(Arc::new(value))
                }
            }
        )*
    };
}

impl_from_arc!(Check, Client, Event, Aggregate, Stash, Silence, Subscription);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_key_joins_client_and_check() {
        let event = Event {
            datacenter: "east".into(),
            id: None,
            client: "web-01".into(),
            check: "check_disk".into(),
            severity: Severity::Critical,
            output: None,
            occurrences: 1,
            action: None,
            silenced: false,
            timestamp: None,
            client_subscriptions: Vec::new(),
            check_subscribers: Vec::new(),
            extra: Extra::new(),
        };
        assert_eq!(event.key(), "web-01/check_disk");
        assert_eq!(MonitoringObject::from(event).kind(), ObjectKind::Event);
    }

    #[test]
    fn severity_from_status() {
        assert_eq!(Severity::from(0), Severity::Ok);
        assert_eq!(Severity::from(1), Severity::Warning);
        assert_eq!(Severity::from(2), Severity::Critical);
        assert_eq!(Severity::from(3), Severity::Unknown);
        assert_eq!(Severity::from(-1), Severity::Unknown);
    }

    #[test]
    fn silence_entry_id_uses_wildcards() {
        assert_eq!(Silence::entry_id(Some("linux"), None), "linux:*");
        assert_eq!(Silence::entry_id(None, Some("check_cpu")), "*:check_cpu");
        assert_eq!(
            Silence::entry_id(Some("client:web-01"), Some("check_cpu")),
            "client:web-01:check_cpu"
        );
    }

    #[test]
    fn object_kind_round_trips_through_strings() {
        assert_eq!(ObjectKind::Silence.to_string(), "silence");
        assert_eq!("stash".parse::<ObjectKind>().ok(), Some(ObjectKind::Stash));
    }
}
