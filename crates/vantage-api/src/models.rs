// Datacenter API wire types
//
// Models for the monitoring datacenter's JSON API. Payloads are bare JSON
// arrays or objects (no envelope). Fields use `#[serde(default)]` liberally
// because datacenters running different engine versions disagree about
// field presence; anything not modeled lands in `extra`.

use serde::{Deserialize, Serialize};

type Extra = serde_json::Map<String, serde_json::Value>;

// ── Checks ───────────────────────────────────────────────────────────

/// Check definition from `GET /checks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCheck {
    pub name: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub subscribers: Vec<String>,
    #[serde(default)]
    pub interval: Option<u64>,
    #[serde(default)]
    pub standalone: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Monitored client from `GET /clients`, also the body of `POST /clients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClient {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Unix seconds of the last keepalive.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Events ───────────────────────────────────────────────────────────

/// Check result nested inside an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventCheck {
    pub name: String,
    /// 0=ok, 1=warning, 2=critical, anything else=unknown.
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub subscribers: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Open event from `GET /events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub client: RawClient,
    pub check: RawEventCheck,
    #[serde(default)]
    pub occurrences: u64,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub silenced: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Aggregates ───────────────────────────────────────────────────────

/// Aggregate summary from `GET /aggregates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAggregate {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Stashes ──────────────────────────────────────────────────────────

/// Stash from `GET /stashes`, also the body of `POST /stashes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStash {
    pub path: String,
    #[serde(default)]
    pub content: serde_json::Map<String, serde_json::Value>,
    /// Seconds until expiry; `-1` or absent means never.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
}

// ── Silenced ─────────────────────────────────────────────────────────

/// Silence entry from `GET /silenced`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSilence {
    pub id: String,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub check: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub expire: Option<i64>,
    #[serde(default)]
    pub expire_on_resolve: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Request bodies ───────────────────────────────────────────────────

/// Body of `POST /silenced`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SilenceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    pub expire_on_resolve: bool,
}

/// Body of `POST /request` (ad-hoc check execution).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckRequest {
    pub check: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_keeps_unknown_fields_in_extra() {
        let raw: RawClient = serde_json::from_value(json!({
            "name": "web-01",
            "subscriptions": ["linux"],
            "environment": "prod"
        }))
        .unwrap();

        assert_eq!(raw.name, "web-01");
        assert_eq!(raw.extra.get("environment"), Some(&json!("prod")));
        assert!(raw.address.is_none());
    }

    #[test]
    fn silence_request_omits_unset_fields() {
        let body = serde_json::to_value(SilenceRequest {
            check: Some("check_disk".into()),
            expire_on_resolve: true,
            ..SilenceRequest::default()
        })
        .unwrap();

        assert_eq!(
            body,
            json!({ "check": "check_disk", "expire_on_resolve": true })
        );
    }
}
