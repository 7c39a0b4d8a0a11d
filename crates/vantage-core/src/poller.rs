// ── Datacenter poller ──
//
// One cycle fetches every datacenter in parallel and assembles the next
// snapshot. A failing datacenter only affects its own slice; the cycle
// itself never fails.

use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use vantage_api::{BasicAuth, SensuClient, TlsMode, TransportConfig};

use crate::config::{DatacenterConfig, Policy, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::model::DatacenterStatus;
use crate::store::{Collections, DatacenterSlice, Fetched, Snapshot};

/// A configured datacenter paired with its API client.
#[derive(Debug, Clone)]
pub(crate) struct Backend {
    pub name: String,
    pub client: SensuClient,
    /// Bound on one poll of this datacenter.
    pub poll_timeout: Duration,
}

impl Backend {
    pub(crate) fn connect(dc: &DatacenterConfig, policy: &Policy) -> Result<Self, CoreError> {
        let poll_timeout = dc.timeout.unwrap_or(policy.poll_timeout);
        let transport = TransportConfig {
            tls: match &dc.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            // The outer tokio timeouts govern; this only stops leaked sockets.
            timeout: poll_timeout.max(policy.dispatch_timeout),
        };
        let auth = dc.credentials.as_ref().map(|c| BasicAuth {
            username: c.username.clone(),
            password: c.password.clone(),
        });

        let client = SensuClient::new(dc.url.clone(), auth, &transport)
            .map_err(|e| CoreError::config(format!("datacenter '{}': {e}", dc.name)))?;

        Ok(Self {
            name: dc.name.clone(),
            client,
            poll_timeout,
        })
    }
}

/// Fetch all six collections of one datacenter concurrently.
async fn fetch(backend: &Backend) -> Result<Fetched, vantage_api::Error> {
    let api = &backend.client;
    let (checks, clients, events, aggregates, stashes, silenced) = tokio::join!(
        api.list_checks(),
        api.list_clients(),
        api.list_events(),
        api.list_aggregates(),
        api.list_stashes(),
        api.list_silenced(),
    );

    let dc = backend.name.as_str();
    Ok(Fetched {
        checks: checks?.into_iter().map(|r| convert::check(dc, r)).collect(),
        clients: clients?.into_iter().map(|r| convert::client(dc, r)).collect(),
        events: events?.into_iter().map(|r| convert::event(dc, r)).collect(),
        aggregates: aggregates?
            .into_iter()
            .map(|r| convert::aggregate(dc, r))
            .collect(),
        stashes: stashes?.into_iter().map(|r| convert::stash(dc, r)).collect(),
        silences: silenced?
            .into_iter()
            .map(|r| convert::silence(dc, r))
            .collect(),
    })
}

/// Poll one datacenter under its timeout, reducing any failure to a reason.
async fn poll_datacenter(backend: &Backend) -> Result<Collections, String> {
    debug!(datacenter = %backend.name, "polling datacenter");
    match tokio::time::timeout(backend.poll_timeout, fetch(backend)).await {
        Ok(Ok(fetched)) => Ok(Collections::from_fetched(&backend.name, fetched)),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "poll timed out after {}s",
            backend.poll_timeout.as_secs_f64()
        )),
    }
}

/// Run one poll cycle and build the snapshot that follows `previous`.
pub(crate) async fn poll_cycle(
    backends: &[Backend],
    policy: &Policy,
    previous: &Snapshot,
) -> Snapshot {
    let results = join_all(backends.iter().map(poll_datacenter)).await;
    let finished_at = Utc::now();

    let slices = backends
        .iter()
        .zip(results)
        .map(|(backend, result)| match result {
            Ok(data) => DatacenterSlice {
                status: DatacenterStatus::reachable(&backend.name, finished_at),
                data: std::sync::Arc::new(data),
            },
            Err(reason) => {
                warn!(datacenter = %backend.name, error = %reason, "datacenter poll failed");
                let data = previous
                    .datacenter(&backend.name)
                    .filter(|_| policy.retain_stale_data)
                    .map(|prev| prev.data.clone())
                    .unwrap_or_default();
                DatacenterSlice {
                    status: DatacenterStatus::unreachable(&backend.name, reason, finished_at),
                    data,
                }
            }
        })
        .collect();

    let next = Snapshot::new(previous.generation() + 1, finished_at, slices);
    let metrics = next.metrics();
    info!(
        generation = next.generation(),
        reachable = metrics.datacenters_reachable,
        total = metrics.datacenters_total,
        clients = next.clients().len(),
        events = next.events().len(),
        "snapshot built"
    );
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn per_datacenter_timeout_overrides_policy() {
        let policy = Policy::default();
        let mut dc = DatacenterConfig::new("east", "http://east.local:4567".parse().unwrap());
        assert_eq!(Backend::connect(&dc, &policy).unwrap().poll_timeout, policy.poll_timeout);

        dc.timeout = Some(Duration::from_millis(250));
        let backend = Backend::connect(&dc, &policy).unwrap();
        assert_eq!(backend.poll_timeout, Duration::from_millis(250));
        assert_eq!(backend.name, "east");
    }

    #[test]
    fn missing_ca_file_is_a_config_error() {
        let mut dc = DatacenterConfig::new("east", "https://east.local".parse().unwrap());
        dc.tls = TlsVerification::CustomCa("/nonexistent/ca.pem".into());
        let err = Backend::connect(&dc, &Policy::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
