// ── Runtime dashboard configuration ──
//
// These types describe *which* datacenters to aggregate and *what* the
// dashboard policy is. They carry credential data but never touch disk:
// `vantage-config` (or a test) builds a `DashboardConfig` and hands it in.
// Everything here is immutable once the `Dashboard` is constructed.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;
use crate::model::{DatacenterScope, Identity};

/// TLS verification strategy for a datacenter endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Basic-auth credentials for a datacenter API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// One configured datacenter.
#[derive(Debug, Clone)]
pub struct DatacenterConfig {
    /// Unique datacenter name (the `dc` every object is tagged with).
    pub name: String,
    /// API base URL (e.g., `http://sensu-east:4567`).
    pub url: Url,
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    /// Per-datacenter poll timeout; falls back to `Policy::poll_timeout`.
    pub timeout: Option<Duration>,
}

impl DatacenterConfig {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: None,
        }
    }
}

/// Access rules attached to a role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub name: String,
    pub datacenters: DatacenterScope,
    pub subscriptions: Option<BTreeSet<String>>,
    pub readonly: bool,
}

/// Dashboard-wide behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// How often the poller runs. `Duration::ZERO` disables the background loop.
    pub refresh_interval: Duration,
    /// Default bound on one datacenter's fetch phase.
    pub poll_timeout: Duration,
    /// Bound on one dispatched command.
    pub dispatch_timeout: Duration,
    /// Silences must carry a non-empty reason.
    pub require_silencing_reason: bool,
    /// Silences must expire (after a duration or on resolve).
    pub disable_no_expiration: bool,
    /// Keep serving a failed datacenter's last-known data (flagged stale)
    /// instead of dropping it from the snapshot.
    pub retain_stale_data: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(5),
            dispatch_timeout: Duration::from_secs(10),
            require_silencing_reason: false,
            disable_no_expiration: false,
            retain_stale_data: true,
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────

/// Validated, load-time list of datacenters and roles.
#[derive(Debug, Clone)]
pub struct Registry {
    datacenters: Vec<DatacenterConfig>,
    roles: Vec<RoleConfig>,
}

impl Registry {
    /// Validate and freeze the registry.
    ///
    /// Fails on an empty datacenter list, empty or duplicate names,
    /// non-http(s) URLs, duplicate role names, and roles that reference
    /// datacenters that are not configured.
    pub fn new(
        datacenters: Vec<DatacenterConfig>,
        roles: Vec<RoleConfig>,
    ) -> Result<Self, CoreError> {
        if datacenters.is_empty() {
            return Err(CoreError::config("at least one datacenter must be configured"));
        }

        let mut names = HashSet::new();
        for dc in &datacenters {
            if dc.name.trim().is_empty() {
                return Err(CoreError::config("datacenter name must not be empty"));
            }
            if !names.insert(dc.name.as_str()) {
                return Err(CoreError::config(format!(
                    "duplicate datacenter name '{}'",
                    dc.name
                )));
            }
            if !matches!(dc.url.scheme(), "http" | "https") {
                return Err(CoreError::config(format!(
                    "datacenter '{}': unsupported URL scheme '{}'",
                    dc.name,
                    dc.url.scheme()
                )));
            }
        }

        let mut role_names = HashSet::new();
        for role in &roles {
            if !role_names.insert(role.name.as_str()) {
                return Err(CoreError::config(format!(
                    "duplicate role name '{}'",
                    role.name
                )));
            }
            if let DatacenterScope::Only(allowed) = &role.datacenters {
                if let Some(unknown) = allowed.iter().find(|dc| !names.contains(dc.as_str())) {
                    return Err(CoreError::config(format!(
                        "role '{}' references unknown datacenter '{unknown}'",
                        role.name
                    )));
                }
            }
        }

        Ok(Self { datacenters, roles })
    }

    /// Datacenters in configuration order.
    pub fn datacenters(&self) -> &[DatacenterConfig] {
        &self.datacenters
    }

    pub fn datacenter(&self, name: &str) -> Option<&DatacenterConfig> {
        self.datacenters.iter().find(|dc| dc.name == name)
    }

    pub fn roles(&self) -> &[RoleConfig] {
        &self.roles
    }

    pub fn role(&self, name: &str) -> Option<&RoleConfig> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// Build the `Identity` for an authenticated user holding `role`.
    ///
    /// An unknown role yields an identity with no access.
    pub fn identity_for(&self, username: &str, role: &str) -> Identity {
        match self.role(role) {
            Some(rc) => Identity {
                username: Some(username.to_owned()),
                role: Some(rc.name.clone()),
                datacenters: rc.datacenters.clone(),
                subscriptions: rc.subscriptions.clone(),
                readonly: rc.readonly,
            },
            None => Identity {
                username: Some(username.to_owned()),
                role: Some(role.to_owned()),
                ..Identity::anonymous()
            },
        }
    }
}

/// Everything the `Dashboard` needs at construction time.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub registry: Registry,
    pub policy: Policy,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dc(name: &str) -> DatacenterConfig {
        DatacenterConfig::new(name, format!("http://{name}.local:4567").parse().unwrap())
    }

    fn role(name: &str, scope: DatacenterScope) -> RoleConfig {
        RoleConfig {
            name: name.into(),
            datacenters: scope,
            subscriptions: None,
            readonly: false,
        }
    }

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(
            Registry::new(Vec::new(), Vec::new()),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_datacenters() {
        let err = Registry::new(vec![dc("east"), dc("east")], Vec::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate datacenter"));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut bad = dc("east");
        bad.url = "ftp://east.local".parse().unwrap();
        assert!(Registry::new(vec![bad], Vec::new()).is_err());
    }

    #[test]
    fn rejects_role_with_unknown_datacenter() {
        let err = Registry::new(
            vec![dc("east")],
            vec![role("viewer", DatacenterScope::only(["north"]))],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown datacenter 'north'"));
    }

    #[test]
    fn identity_for_known_and_unknown_roles() {
        let registry = Registry::new(
            vec![dc("east"), dc("west")],
            vec![role("viewer", DatacenterScope::only(["east"]))],
        )
        .unwrap();

        let viewer = registry.identity_for("alice", "viewer");
        assert!(viewer.datacenters.contains("east"));
        assert!(!viewer.datacenters.contains("west"));

        let nobody = registry.identity_for("bob", "intern");
        assert!(!nobody.datacenters.contains("east"));
        assert!(nobody.readonly);
    }
}
