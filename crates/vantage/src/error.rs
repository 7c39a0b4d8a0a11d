//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vantage_config::ConfigError;
use vantage_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(vantage::no_config),
        help(
            "Create one, pass --config <path>, or set VANTAGE_CONFIG.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(
        code(vantage::config),
        help("Run: vantage check-config to validate the file.")
    )]
    Config { reason: String },

    // ── Datacenters ──────────────────────────────────────────────────
    #[error("{unreachable} of {total} datacenter(s) unreachable")]
    #[diagnostic(
        code(vantage::unreachable),
        help("Check the datacenter URLs and credentials; rerun with -v for details.")
    )]
    Unreachable { unreachable: usize, total: usize },

    #[error("Datacenter '{datacenter}' is unreachable: {reason}")]
    #[diagnostic(code(vantage::connection_failed))]
    ConnectionFailed { datacenter: String, reason: String },

    #[error("{kind} '{key}' not found")]
    #[diagnostic(code(vantage::not_found))]
    NotFound { kind: String, key: String },

    #[error("Datacenter '{datacenter}' rejected the request: {reason}")]
    #[diagnostic(code(vantage::rejected))]
    Rejected { datacenter: String, reason: String },

    #[error("Invalid request: {reason}")]
    #[diagnostic(code(vantage::validation))]
    Validation { reason: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(vantage::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not encode output: {0}")]
    #[diagnostic(code(vantage::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config { .. } => exit_code::CONFIG,
            Self::Unreachable { .. } | Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Upstream error mapping ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            other => Self::Config {
                reason: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Config { reason: message },
            CoreError::DatacenterUnreachable { datacenter, reason } => {
                Self::ConnectionFailed { datacenter, reason }
            }
            CoreError::RemoteRejected { datacenter, reason } => {
                Self::Rejected { datacenter, reason }
            }
            CoreError::NotFound { kind, key } => Self::NotFound { kind, key },
            CoreError::InvalidPayload { reason } => Self::Validation { reason },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let missing = CliError::from(ConfigError::NotFound {
            path: "/etc/vantage.toml".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::CONFIG);

        let down = CliError::from(CoreError::DatacenterUnreachable {
            datacenter: "east".into(),
            reason: "timed out".into(),
        });
        assert_eq!(down.exit_code(), exit_code::CONNECTION);

        let gone = CliError::from(CoreError::NotFound {
            kind: "client".into(),
            key: "web-01".into(),
        });
        assert_eq!(gone.exit_code(), exit_code::NOT_FOUND);
    }
}
