// ── Caller identity ──
//
// The authentication layer resolves a request into an `Identity`; the
// core only ever reads it. Access is deny-by-default: an identity built
// with `Identity::anonymous()` sees nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which datacenters an identity may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatacenterScope {
    /// Every configured datacenter.
    All,
    /// Exactly the listed datacenters. An empty set grants nothing.
    Only(BTreeSet<String>),
}

impl DatacenterScope {
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, datacenter: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(datacenter),
        }
    }
}

/// An authenticated caller and the access derived from its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: Option<String>,
    pub role: Option<String>,
    pub datacenters: DatacenterScope,
    /// Finer rule: when set, subscription-bearing objects are visible only
    /// if they share at least one subscription with this set.
    pub subscriptions: Option<BTreeSet<String>>,
    /// Read-only identities may see but never act.
    pub readonly: bool,
}

impl Identity {
    /// An identity with no access at all.
    pub fn anonymous() -> Self {
        Self {
            username: None,
            role: None,
            datacenters: DatacenterScope::none(),
            subscriptions: None,
            readonly: true,
        }
    }

    pub fn new(username: impl Into<String>, datacenters: DatacenterScope) -> Self {
        Self {
            username: Some(username.into()),
            role: None,
            datacenters,
            subscriptions: None,
            readonly: false,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_subscriptions<I, S>(mut self, subscriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subscriptions = Some(subscriptions.into_iter().map(Into::into).collect());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.readonly = true;
        self
    }
}
