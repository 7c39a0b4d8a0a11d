// ── Authorization filter ──
//
// Pure, deny-by-default visibility rules. A datacenter outside the
// identity's scope hides everything it owns. When the identity also
// carries a subscription scope, subscription-bearing objects must share
// at least one subscription with it.

use std::sync::Arc;

use crate::model::{
    Aggregate, Check, Client, DatacenterStatus, Event, Identity, MonitoringObject, ObjectKind,
    Silence, Stash, Subscription,
};

/// Everything the filter can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Check,
    Client,
    Event,
    Aggregate,
    Stash,
    Silence,
    Subscription,
    Datacenter,
}

impl From<ObjectKind> for ResourceKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Check => Self::Check,
            ObjectKind::Client => Self::Client,
            ObjectKind::Event => Self::Event,
            ObjectKind::Aggregate => Self::Aggregate,
            ObjectKind::Stash => Self::Stash,
            ObjectKind::Silence => Self::Silence,
            ObjectKind::Subscription => Self::Subscription,
        }
    }
}

/// Anything the filter can decide on.
pub trait Scoped {
    fn resource_kind(&self) -> ResourceKind;

    /// Owning datacenter.
    fn datacenter(&self) -> &str;

    /// Subscriptions the finer rule matches against; `None` for kinds
    /// that have no subscription attribute.
    fn subscription_tags(&self) -> Option<Vec<&str>>;
}

fn tags(list: &[String]) -> Option<Vec<&str>> {
    Some(list.iter().map(String::as_str).collect())
}

impl Scoped for Check {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Check
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        tags(&self.subscribers)
    }
}

impl Scoped for Client {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Client
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        tags(&self.subscriptions)
    }
}

impl Scoped for Event {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Event
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    /// The client's subscriptions, or the check's subscribers when the
    /// event does not carry them.
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        if self.client_subscriptions.is_empty() {
            tags(&self.check_subscribers)
        } else {
            tags(&self.client_subscriptions)
        }
    }
}

impl Scoped for Silence {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Silence
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    /// A check-only silence has no subscription and is therefore hidden
    /// from subscription-scoped identities.
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        Some(self.subscription.as_deref().into_iter().collect())
    }
}

impl Scoped for Subscription {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Subscription
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        Some(vec![self.name.as_str()])
    }
}

impl Scoped for Aggregate {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Aggregate
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        None
    }
}

impl Scoped for Stash {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Stash
    }
    fn datacenter(&self) -> &str {
        &self.datacenter
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        None
    }
}

impl Scoped for DatacenterStatus {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Datacenter
    }
    fn datacenter(&self) -> &str {
        &self.name
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        None
    }
}

impl<T: Scoped + ?Sized> Scoped for Arc<T> {
    fn resource_kind(&self) -> ResourceKind {
        (**self).resource_kind()
    }
    fn datacenter(&self) -> &str {
        (**self).datacenter()
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        (**self).subscription_tags()
    }
}

impl Scoped for MonitoringObject {
    fn resource_kind(&self) -> ResourceKind {
        self.kind().into()
    }
    fn datacenter(&self) -> &str {
        MonitoringObject::datacenter(self)
    }
    fn subscription_tags(&self) -> Option<Vec<&str>> {
        match self {
            Self::Check(o) => o.subscription_tags(),
            Self::Client(o) => o.subscription_tags(),
            Self::Event(o) => o.subscription_tags(),
            Self::Aggregate(o) => o.subscription_tags(),
            Self::Stash(o) => o.subscription_tags(),
            Self::Silence(o) => o.subscription_tags(),
            Self::Subscription(o) => o.subscription_tags(),
        }
    }
}

// ── Rules ────────────────────────────────────────────────────────────

pub fn is_authorized_for_datacenter(identity: &Identity, datacenter: &str) -> bool {
    !datacenter.is_empty() && identity.datacenters.contains(datacenter)
}

/// Whether `identity` may see `object`.
pub fn is_visible<T: Scoped + ?Sized>(identity: &Identity, object: &T) -> bool {
    if !is_authorized_for_datacenter(identity, object.datacenter()) {
        return false;
    }
    match (&identity.subscriptions, object.subscription_tags()) {
        (Some(allowed), Some(tags)) => tags.iter().any(|t| allowed.contains(*t)),
        _ => true,
    }
}

/// Whether `identity` may issue a command against `object`.
pub fn can_act_on<T: Scoped + ?Sized>(identity: &Identity, object: &T) -> bool {
    !identity.readonly && is_visible(identity, object)
}

/// The visible objects of `kind`, in input order.
///
/// Objects of any other kind are dropped. Applying the filter twice
/// yields the same result as applying it once.
pub fn filter_collection(
    identity: &Identity,
    kind: ObjectKind,
    objects: Vec<MonitoringObject>,
) -> Vec<MonitoringObject> {
    objects
        .into_iter()
        .filter(|o| o.kind() == kind && is_visible(identity, o))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DatacenterScope, Extra, Severity};

    fn client(dc: &str, name: &str, subs: &[&str]) -> MonitoringObject {
        Client {
            datacenter: dc.into(),
            name: name.into(),
            address: None,
            subscriptions: subs.iter().map(|s| (*s).to_owned()).collect(),
            version: None,
            last_seen: None,
            extra: Extra::new(),
        }
        .into()
    }

    fn silence(dc: &str, subscription: Option<&str>, check: Option<&str>) -> MonitoringObject {
        Silence {
            datacenter: dc.into(),
            id: Silence::entry_id(subscription, check),
            subscription: subscription.map(Into::into),
            check: check.map(Into::into),
            reason: None,
            creator: None,
            expire: None,
            expire_on_resolve: false,
            extra: Extra::new(),
        }
        .into()
    }

    fn names(objects: &[MonitoringObject]) -> Vec<String> {
        objects
            .iter()
            .map(|o| format!("{}:{}", o.datacenter(), o.key()))
            .collect()
    }

    #[test]
    fn viewer_sees_only_its_datacenter() {
        let viewer = Identity::new("alice", DatacenterScope::only(["east"]));
        let clients = vec![
            client("east", "a", &[]),
            client("west", "b", &[]),
            client("east", "c", &[]),
        ];

        let visible = filter_collection(&viewer, ObjectKind::Client, clients);
        assert_eq!(names(&visible), vec!["east:a", "east:c"]);
    }

    #[test]
    fn empty_scope_sees_nothing() {
        let clients = vec![client("east", "a", &[]), client("west", "b", &[])];
        assert!(filter_collection(&Identity::anonymous(), ObjectKind::Client, clients).is_empty());
        assert!(!is_authorized_for_datacenter(&Identity::anonymous(), "east"));
    }

    #[test]
    fn filter_is_idempotent_and_drops_other_kinds() {
        let identity = Identity::new("bob", DatacenterScope::All).with_subscriptions(["linux"]);
        let mixed = vec![
            client("east", "a", &["linux"]),
            client("east", "b", &["windows"]),
            silence("east", Some("linux"), None),
        ];

        let once = filter_collection(&identity, ObjectKind::Client, mixed);
        let twice = filter_collection(&identity, ObjectKind::Client, once.clone());
        assert_eq!(names(&once), vec!["east:a"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn subscription_scope_applies_per_kind() {
        let identity = Identity::new("carol", DatacenterScope::All)
            .with_subscriptions(["linux", "client:web-01"]);

        assert!(is_visible(&identity, &silence("east", Some("linux"), None)));
        assert!(is_visible(&identity, &silence("east", Some("client:web-01"), Some("check_cpu"))));
        assert!(!is_visible(&identity, &silence("east", None, Some("check_cpu"))));

        let aggregate: MonitoringObject = Aggregate {
            datacenter: "east".into(),
            name: "web".into(),
            extra: Extra::new(),
        }
        .into();
        assert!(is_visible(&identity, &aggregate));
        assert!(is_visible(&identity, &DatacenterStatus::unknown("west")));
    }

    #[test]
    fn event_falls_back_to_check_subscribers() {
        let identity = Identity::new("dave", DatacenterScope::All).with_subscriptions(["nginx"]);
        let mut event = Event {
            datacenter: "east".into(),
            id: None,
            client: "web-01".into(),
            check: "check_http".into(),
            severity: Severity::Warning,
            output: None,
            occurrences: 1,
            action: None,
            silenced: false,
            timestamp: None,
            client_subscriptions: Vec::new(),
            check_subscribers: vec!["nginx".into()],
            extra: Extra::new(),
        };
        assert!(is_visible(&identity, &event));

        event.client_subscriptions = vec!["linux".into()];
        assert!(!is_visible(&identity, &event));
    }

    #[test]
    fn readonly_identity_cannot_act() {
        let target = client("east", "a", &[]);
        let admin = Identity::new("root", DatacenterScope::All);
        assert!(can_act_on(&admin, &target));
        assert!(!can_act_on(&admin.clone().read_only(), &target));
        assert!(!can_act_on(&Identity::new("x", DatacenterScope::only(["west"])), &target));
    }
}
