// ── Typed request payloads for Command variants ──

use serde::{Deserialize, Serialize};

use crate::model::Extra;

/// Payload of `Command::CreateSilence`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSilenceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Overwritten with the caller's username by `Dashboard::execute`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Seconds until the silence expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    #[serde(default)]
    pub expire_on_resolve: bool,
}

impl CreateSilenceRequest {
    /// The id the datacenter will assign to the resulting entry.
    pub fn entry_id(&self) -> String {
        crate::model::Silence::entry_id(self.subscription.as_deref(), self.check.as_deref())
    }
}

/// Payload of `Command::CreateStash`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateStashRequest {
    pub path: String,
    #[serde(default)]
    pub content: Extra,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
}

/// Payload of `Command::IssueCheckExecution`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckExecutionRequest {
    pub check: String,
    /// Restrict the execution to these subscribers; empty means the
    /// check's own subscribers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload of `Command::UpdateClient` (create or replace a client).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
