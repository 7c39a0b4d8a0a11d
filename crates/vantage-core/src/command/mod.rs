// ── Command API ──
//
// All write operations flow through a unified `Command` enum. Every
// variant names the datacenter that owns its target; the dispatcher
// validates it locally and relays it to that datacenter only.

mod dispatch;
pub mod requests;
mod validate;

use serde::Serialize;

use crate::model::ObjectKind;

pub(crate) use dispatch::dispatch;
pub use requests::{
    CheckExecutionRequest, CreateSilenceRequest, CreateStashRequest, UpdateClientRequest,
};
pub(crate) use validate::validate;

/// All write operations against a datacenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Delete-object family ─────────────────────────────────────────
    DeleteClient {
        datacenter: String,
        name: String,
    },
    DeleteAggregate {
        datacenter: String,
        name: String,
    },
    DeleteCheckResult {
        datacenter: String,
        client: String,
        check: String,
    },

    // ── Events ───────────────────────────────────────────────────────
    ResolveEvent {
        datacenter: String,
        client: String,
        check: String,
    },

    // ── Silencing ────────────────────────────────────────────────────
    CreateSilence {
        datacenter: String,
        request: CreateSilenceRequest,
    },
    ClearSilence {
        datacenter: String,
        id: String,
    },

    // ── Stashes ──────────────────────────────────────────────────────
    CreateStash {
        datacenter: String,
        request: CreateStashRequest,
    },
    DeleteStash {
        datacenter: String,
        path: String,
    },

    // ── Checks / clients ─────────────────────────────────────────────
    IssueCheckExecution {
        datacenter: String,
        request: CheckExecutionRequest,
    },
    UpdateClient {
        datacenter: String,
        request: UpdateClientRequest,
    },
}

/// Discriminant of `Command`, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    DeleteClient,
    DeleteAggregate,
    DeleteCheckResult,
    ResolveEvent,
    CreateSilence,
    ClearSilence,
    CreateStash,
    DeleteStash,
    IssueCheckExecution,
    UpdateClient,
}

impl Command {
    /// The datacenter this command is relayed to.
    pub fn datacenter(&self) -> &str {
        match self {
            Self::DeleteClient { datacenter, .. }
            | Self::DeleteAggregate { datacenter, .. }
            | Self::DeleteCheckResult { datacenter, .. }
            | Self::ResolveEvent { datacenter, .. }
            | Self::CreateSilence { datacenter, .. }
            | Self::ClearSilence { datacenter, .. }
            | Self::CreateStash { datacenter, .. }
            | Self::DeleteStash { datacenter, .. }
            | Self::IssueCheckExecution { datacenter, .. }
            | Self::UpdateClient { datacenter, .. } => datacenter,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::DeleteClient { .. } => CommandKind::DeleteClient,
            Self::DeleteAggregate { .. } => CommandKind::DeleteAggregate,
            Self::DeleteCheckResult { .. } => CommandKind::DeleteCheckResult,
            Self::ResolveEvent { .. } => CommandKind::ResolveEvent,
            Self::CreateSilence { .. } => CommandKind::CreateSilence,
            Self::ClearSilence { .. } => CommandKind::ClearSilence,
            Self::CreateStash { .. } => CommandKind::CreateStash,
            Self::DeleteStash { .. } => CommandKind::DeleteStash,
            Self::IssueCheckExecution { .. } => CommandKind::IssueCheckExecution,
            Self::UpdateClient { .. } => CommandKind::UpdateClient,
        }
    }

    /// Kind and key of the object this command acts on.
    pub fn target(&self) -> (ObjectKind, String) {
        match self {
            Self::DeleteClient { name, .. } => (ObjectKind::Client, name.clone()),
            Self::UpdateClient { request, .. } => (ObjectKind::Client, request.name.clone()),
            Self::DeleteAggregate { name, .. } => (ObjectKind::Aggregate, name.clone()),
            Self::DeleteCheckResult { client, check, .. }
            | Self::ResolveEvent { client, check, .. } => {
                (ObjectKind::Event, format!("{client}/{check}"))
            }
            Self::CreateSilence { request, .. } => (ObjectKind::Silence, request.entry_id()),
            Self::ClearSilence { id, .. } => (ObjectKind::Silence, id.clone()),
            Self::CreateStash { request, .. } => (ObjectKind::Stash, request.path.clone()),
            Self::DeleteStash { path, .. } => (ObjectKind::Stash, path.clone()),
            Self::IssueCheckExecution { request, .. } => {
                (ObjectKind::Check, request.check.clone())
            }
        }
    }
}

/// Outcome of a command the datacenter accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Accepted { datacenter: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_of_event_commands_uses_event_key() {
        let cmd = Command::ResolveEvent {
            datacenter: "east".into(),
            client: "web-01".into(),
            check: "check_disk".into(),
        };
        assert_eq!(cmd.target(), (ObjectKind::Event, "web-01/check_disk".into()));
        assert_eq!(cmd.datacenter(), "east");
        assert_eq!(cmd.kind().to_string(), "resolve_event");
    }

    #[test]
    fn create_silence_targets_its_entry_id() {
        let cmd = Command::CreateSilence {
            datacenter: "west".into(),
            request: CreateSilenceRequest {
                subscription: Some("linux".into()),
                ..CreateSilenceRequest::default()
            },
        };
        assert_eq!(cmd.target(), (ObjectKind::Silence, "linux:*".into()));
    }
}
