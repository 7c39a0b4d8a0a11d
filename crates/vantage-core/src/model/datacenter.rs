// ── Datacenter runtime status ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability of a datacenter as observed by the most recent poll.
///
/// `Unknown` only before the first poll; afterwards a datacenter flips
/// between `Reachable` and `Unreachable` at poll boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Health {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// Poll-derived status of one datacenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterStatus {
    pub name: String,
    pub health: Health,
    /// Error from the most recent failed poll; cleared on success.
    pub last_error: Option<String>,
    /// When the most recent poll attempt finished.
    pub last_poll: Option<DateTime<Utc>>,
    /// `true` when the data served for this datacenter was carried over
    /// from an earlier cycle (or dropped) because the last poll failed.
    pub stale: bool,
}

impl DatacenterStatus {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: Health::Unknown,
            last_error: None,
            last_poll: None,
            stale: false,
        }
    }

    pub(crate) fn reachable(name: &str, at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_owned(),
            health: Health::Reachable,
            last_error: None,
            last_poll: Some(at),
            stale: false,
        }
    }

    pub(crate) fn unreachable(name: &str, error: String, at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_owned(),
            health: Health::Unreachable,
            last_error: Some(error),
            last_poll: Some(at),
            stale: true,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.health == Health::Reachable
    }
}
