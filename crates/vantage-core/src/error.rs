// ── Core error types ──
//
// Dashboard-level errors. Consumers never see HTTP status codes or JSON
// parse failures directly: `CoreError::from_api` folds transport-layer
// errors into the outcomes a write caller can act on.
//
// There is no `Forbidden` variant: an authorization denial is reported
// exactly like absence (`NotFound`, an empty collection, or `false`).

use thiserror::Error;

use crate::model::ObjectKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Datacenter outcomes ──────────────────────────────────────────
    #[error("Datacenter '{datacenter}' is unreachable: {reason}")]
    DatacenterUnreachable { datacenter: String, reason: String },

    #[error("Datacenter '{datacenter}' rejected the command: {reason}")]
    RemoteRejected { datacenter: String, reason: String },

    // ── Lookup / validation ──────────────────────────────────────────
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(kind: impl ToString, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            key: key.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Translate a wire error from `datacenter` while acting on `kind`/`key`.
    pub fn from_api(
        datacenter: &str,
        kind: ObjectKind,
        key: &str,
        err: vantage_api::Error,
    ) -> Self {
        if err.is_not_found() {
            return Self::not_found(kind, key);
        }
        if err.is_unreachable() {
            return Self::DatacenterUnreachable {
                datacenter: datacenter.to_owned(),
                reason: err.to_string(),
            };
        }
        match err {
            vantage_api::Error::Http { status, message } => Self::RemoteRejected {
                datacenter: datacenter.to_owned(),
                reason: format!("HTTP {status}: {message}"),
            },
            other => Self::RemoteRejected {
                datacenter: datacenter.to_owned(),
                reason: other.to_string(),
            },
        }
    }

    /// `true` for the outcome reported when a caller may not see a target.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
