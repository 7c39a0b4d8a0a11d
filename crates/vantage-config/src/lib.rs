//! Configuration for the vantage dashboard.
//!
//! TOML file + `VANTAGE_*` environment overrides, password resolution
//! (env var or plaintext), and translation to
//! `vantage_core::DashboardConfig`. Validation failures are fatal at
//! startup.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vantage_core::{
    CoreError, Credentials, DashboardConfig, DatacenterConfig, DatacenterScope, Policy, Registry,
    RoleConfig, TlsVerification,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("datacenter '{datacenter}': environment variable {var} is not set")]
    MissingSecret { datacenter: String, var: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            other => Self::Validation {
                field: "config".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub datacenters: Vec<DatacenterEntry>,

    #[serde(default)]
    pub roles: Vec<RoleEntry>,
}

/// `[dashboard]`: polling and command policy.
#[derive(Debug, Deserialize, Serialize)]
pub struct DashboardSection {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,

    #[serde(default)]
    pub require_silencing_reason: bool,

    #[serde(default)]
    pub disable_no_expiration: bool,

    #[serde(default = "default_true")]
    pub retain_stale_data: bool,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            poll_timeout_secs: default_poll_timeout(),
            dispatch_timeout_secs: default_dispatch_timeout(),
            require_silencing_reason: false,
            disable_no_expiration: false,
            retain_stale_data: true,
        }
    }
}

fn default_refresh_interval() -> u64 {
    10
}
fn default_poll_timeout() -> u64 {
    5
}
fn default_dispatch_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

/// `[[datacenters]]`: one monitoring backend.
#[derive(Debug, Deserialize, Serialize)]
pub struct DatacenterEntry {
    pub name: String,

    /// API base URL (e.g., "http://sensu-east:4567").
    pub url: String,

    /// Basic-auth username.
    pub user: Option<String>,

    /// Basic-auth password (plaintext; prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Per-datacenter poll timeout override.
    pub timeout_secs: Option<u64>,

    /// Skip TLS verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

/// `[[roles]]`: access rules for a role name.
#[derive(Debug, Deserialize, Serialize)]
pub struct RoleEntry {
    pub name: String,

    /// Datacenter names, or `["*"]` for all.
    #[serde(default)]
    pub datacenters: Vec<String>,

    /// Optional finer rule on subscriptions.
    pub subscriptions: Option<Vec<String>>,

    #[serde(default)]
    pub readonly: bool,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "vantage", "vantage").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vantage");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the default location) plus
/// `VANTAGE_` environment overrides, e.g.
/// `VANTAGE_DASHBOARD__POLL_TIMEOUT_SECS=3`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    load_from(Figment::new().merge(Toml::file(&path)))
}

/// Load the config from an in-memory TOML document (plus env overrides).
pub fn load_config_str(toml: &str) -> Result<Config, ConfigError> {
    load_from(Figment::new().merge(Toml::string(toml)))
}

fn load_from(source: Figment) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(source)
        .merge(Env::prefixed("VANTAGE_").split("__"));

    Ok(figment.extract()?)
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    /// Validate and translate into the core's runtime config.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        self.dashboard.validate()?;
        let datacenters = self
            .datacenters
            .iter()
            .map(DatacenterEntry::to_core)
            .collect::<Result<Vec<_>, _>>()?;
        let roles = self
            .roles
            .iter()
            .map(RoleEntry::to_core)
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Registry::new(datacenters, roles)?;
        Ok(DashboardConfig {
            registry,
            policy: self.dashboard.to_policy(),
        })
    }
}

impl DashboardSection {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, secs) in [
            ("dashboard.poll_timeout_secs", self.poll_timeout_secs),
            ("dashboard.dispatch_timeout_secs", self.dispatch_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }

    pub fn to_policy(&self) -> Policy {
        Policy {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            poll_timeout: Duration::from_secs(self.poll_timeout_secs),
            dispatch_timeout: Duration::from_secs(self.dispatch_timeout_secs),
            require_silencing_reason: self.require_silencing_reason,
            disable_no_expiration: self.disable_no_expiration,
            retain_stale_data: self.retain_stale_data,
        }
    }
}

impl DatacenterEntry {
    fn to_core(&self) -> Result<DatacenterConfig, ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::Validation {
            field: format!("datacenters.{}.url", self.name),
            reason: e.to_string(),
        })?;
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation {
                field: format!("datacenters.{}.timeout_secs", self.name),
                reason: "must be greater than zero".into(),
            });
        }

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let credentials = match &self.user {
            Some(user) => Some(Credentials {
                username: user.clone(),
                password: resolve_password(self)?,
            }),
            None => None,
        };

        Ok(DatacenterConfig {
            name: self.name.clone(),
            url,
            credentials,
            tls,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

impl RoleEntry {
    fn to_core(&self) -> Result<RoleConfig, ConfigError> {
        let datacenters = if self.datacenters.iter().any(|d| d == "*") {
            if self.datacenters.len() > 1 {
                return Err(ConfigError::Validation {
                    field: format!("roles.{}.datacenters", self.name),
                    reason: "\"*\" cannot be combined with datacenter names".into(),
                });
            }
            DatacenterScope::All
        } else {
            DatacenterScope::only(self.datacenters.iter().cloned())
        };

        Ok(RoleConfig {
            name: self.name.clone(),
            datacenters,
            subscriptions: self
                .subscriptions
                .as_ref()
                .map(|subs| subs.iter().cloned().collect::<BTreeSet<_>>()),
            readonly: self.readonly,
        })
    }
}

/// Resolve a datacenter password: `password_env` first, then plaintext,
/// then empty.
pub fn resolve_password(entry: &DatacenterEntry) -> Result<SecretString, ConfigError> {
    if let Some(ref var) = entry.password_env {
        return std::env::var(var)
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingSecret {
                datacenter: entry.name.clone(),
                var: var.clone(),
            });
    }
    Ok(SecretString::from(entry.password.clone().unwrap_or_default()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
[dashboard]
poll_timeout_secs = 3
require_silencing_reason = true

[[datacenters]]
name = "east"
url = "http://sensu-east:4567"
user = "admin"
password = "hunter2"

[[datacenters]]
name = "west"
url = "https://sensu-west:4567"
timeout_secs = 2
insecure = true

[[roles]]
name = "viewer"
datacenters = ["east"]
subscriptions = ["linux"]
readonly = true

[[roles]]
name = "admin"
datacenters = ["*"]
"#;

    #[test]
    fn sample_translates_to_core_config() {
        let cfg = load_config_str(SAMPLE).unwrap().to_dashboard_config().unwrap();

        assert_eq!(cfg.policy.poll_timeout, Duration::from_secs(3));
        assert_eq!(cfg.policy.refresh_interval, Duration::from_secs(10));
        assert!(cfg.policy.require_silencing_reason);
        assert!(cfg.policy.retain_stale_data);

        let east = cfg.registry.datacenter("east").unwrap();
        let creds = east.credentials.as_ref().unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password.expose_secret(), "hunter2");

        let west = cfg.registry.datacenter("west").unwrap();
        assert_eq!(west.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(west.timeout, Some(Duration::from_secs(2)));
        assert!(west.credentials.is_none());

        let viewer = cfg.registry.role("viewer").unwrap();
        assert!(viewer.readonly);
        assert_eq!(viewer.datacenters, DatacenterScope::only(["east"]));
        assert_eq!(cfg.registry.role("admin").unwrap().datacenters, DatacenterScope::All);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.datacenters.len(), 2);
        assert_eq!(cfg.roles.len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn empty_config_fails_validation() {
        let err = load_config_str("").unwrap().to_dashboard_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn bad_url_names_the_datacenter() {
        let err = load_config_str(
            r#"
[[datacenters]]
name = "east"
url = "not a url"
"#,
        )
        .unwrap()
        .to_dashboard_config()
        .unwrap_err();
        assert!(err.to_string().contains("datacenters.east.url"));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        for (section, field) in [
            ("[dashboard]\npoll_timeout_secs = 0", "dashboard.poll_timeout_secs"),
            ("[dashboard]\ndispatch_timeout_secs = 0", "dashboard.dispatch_timeout_secs"),
            ("", "datacenters.east.timeout_secs"),
        ] {
            let timeout = if section.is_empty() { "timeout_secs = 0" } else { "" };
            let toml = format!(
                "{section}\n\n[[datacenters]]\nname = \"east\"\nurl = \"http://east:4567\"\n{timeout}\n"
            );
            let err = load_config_str(&toml).unwrap().to_dashboard_config().unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[test]
    fn role_with_unknown_datacenter_is_rejected() {
        let err = load_config_str(
            r#"
[[datacenters]]
name = "east"
url = "http://east:4567"

[[roles]]
name = "viewer"
datacenters = ["north"]
"#,
        )
        .unwrap()
        .to_dashboard_config()
        .unwrap_err();
        assert!(err.to_string().contains("north"));
    }

    #[test]
    fn unset_password_env_is_an_error() {
        let entry = DatacenterEntry {
            name: "east".into(),
            url: "http://east:4567".into(),
            user: Some("admin".into()),
            password: None,
            password_env: Some("VANTAGE_TEST_SURELY_UNSET_PASSWORD".into()),
            timeout_secs: None,
            insecure: false,
            ca_cert: None,
        };
        assert!(matches!(
            resolve_password(&entry),
            Err(ConfigError::MissingSecret { .. })
        ));
    }
}
