// ── Dashboard facade ──
//
// Full lifecycle management for the multi-datacenter view. Owns the
// datacenter clients, the snapshot cache and the background poll task,
// and exposes the read, filter and write operations the HTTP layer
// calls with an already-resolved `Identity`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::authz;
use crate::command::{self, Command, CommandResult};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{
    Client, DatacenterStatus, Extra, Identity, MonitoringObject, ObjectKind, Silence,
};
use crate::poller::{self, Backend};
use crate::resolver::{self, Resolution};
use crate::store::{Metrics, Snapshot, SnapshotCache};

/// Overall health: `ok` only when every datacenter answered the last poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub generation: u64,
    pub datacenters: BTreeMap<String, DatacenterStatus>,
}

/// The aggregation cache, resolver, authorization filter and command
/// dispatcher behind one cheaply cloneable handle.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    /// One client per datacenter, in registry order.
    backends: Vec<Backend>,
    cache: SnapshotCache,
    /// Serializes poll cycles so generations are published in order.
    poll_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build the dashboard and one API client per configured datacenter.
    ///
    /// Does not poll: the initial snapshot has generation 0 and every
    /// datacenter `Unknown`. Call [`start()`](Self::start) or
    /// [`poll_once()`](Self::poll_once).
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let backends = config
            .registry
            .datacenters()
            .iter()
            .map(|dc| Backend::connect(dc, &config.policy))
            .collect::<Result<Vec<_>, _>>()?;
        let cache = SnapshotCache::new(Snapshot::empty(&config.registry));

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                backends,
                cache,
                poll_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run a first poll, then keep polling every `refresh_interval` in
    /// the background. A zero interval only runs the first poll.
    pub async fn start(&self) {
        self.poll_once().await;

        let interval = self.inner.config.policy.refresh_interval;
        if interval.is_zero() {
            debug!("background polling disabled");
            return;
        }

        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return;
        }
        handles.push(tokio::spawn(poll_task(
            self.clone(),
            interval,
            self.inner.cancel.clone(),
        )));
        info!(interval_secs = interval.as_secs_f64(), "background polling started");
    }

    /// Stop background polling and wait for the task to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard shut down");
    }

    /// Run one poll cycle and publish its snapshot.
    pub async fn poll_once(&self) -> Arc<Snapshot> {
        let _guard = self.inner.poll_lock.lock().await;
        let previous = self.inner.cache.load();
        let next = poller::poll_cycle(&self.inner.backends, &self.inner.config.policy, &previous).await;
        self.inner.cache.publish(next);
        self.inner.cache.load()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current snapshot. Holding it pins a consistent view.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.cache.load()
    }

    /// Receives the generation of every published snapshot.
    pub fn subscribe_generations(&self) -> watch::Receiver<u64> {
        self.inner.cache.subscribe()
    }

    /// Every object of `kind` across all datacenters, unfiltered.
    pub fn list_collection(&self, kind: ObjectKind) -> Vec<MonitoringObject> {
        self.snapshot().list(kind)
    }

    pub fn get_by_key(
        &self,
        kind: ObjectKind,
        datacenter: &str,
        key: &str,
    ) -> Result<MonitoringObject, CoreError> {
        self.snapshot()
            .get(kind, datacenter, key)
            .ok_or_else(|| CoreError::not_found(kind, key))
    }

    /// Every object of `kind` named `name`, across all datacenters.
    pub fn find_by_name(
        &self,
        kind: ObjectKind,
        name: &str,
    ) -> Result<Vec<MonitoringObject>, CoreError> {
        resolver::find_by_name(&self.snapshot(), kind, name)
    }

    /// Resolve `name` among the objects `identity` may see. Invisible
    /// matches do not count toward ambiguity.
    pub fn resolve_for(
        &self,
        identity: &Identity,
        kind: ObjectKind,
        name: &str,
    ) -> Result<Resolution, CoreError> {
        let matches = self
            .find_by_name(kind, name)?
            .into_iter()
            .filter(|o| authz::is_visible(identity, o))
            .collect();
        Ok(Resolution::from_matches(matches))
    }

    pub fn datacenter_health(&self) -> BTreeMap<String, DatacenterStatus> {
        self.snapshot().health()
    }

    pub fn health_report(&self) -> HealthReport {
        let snapshot = self.snapshot();
        let datacenters = snapshot.health();
        HealthReport {
            ok: datacenters.values().all(DatacenterStatus::is_reachable),
            generation: snapshot.generation(),
            datacenters,
        }
    }

    pub fn metrics(&self) -> Metrics {
        self.snapshot().metrics().clone()
    }

    // ── Authorization ────────────────────────────────────────────────

    pub fn identity_for(&self, username: &str, role: &str) -> Identity {
        self.inner.config.registry.identity_for(username, role)
    }

    pub fn filter_collection(
        &self,
        identity: &Identity,
        kind: ObjectKind,
        objects: Vec<MonitoringObject>,
    ) -> Vec<MonitoringObject> {
        authz::filter_collection(identity, kind, objects)
    }

    pub fn is_authorized_for_datacenter(&self, identity: &Identity, datacenter: &str) -> bool {
        authz::is_authorized_for_datacenter(identity, datacenter)
    }

    /// Status of each datacenter `identity` may see, in registry order.
    pub fn visible_datacenters(&self, identity: &Identity) -> Vec<DatacenterStatus> {
        self.snapshot()
            .datacenters()
            .iter()
            .map(|slice| &slice.status)
            .filter(|status| authz::is_visible(identity, *status))
            .cloned()
            .collect()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Relay `command` to its datacenter without any authorization.
    pub async fn dispatch(&self, command: Command) -> Result<CommandResult, CoreError> {
        command::dispatch(&self.inner.backends, &self.inner.config.policy, command).await
    }

    /// Validate, authorize, stamp and dispatch `command` on behalf of
    /// `identity`. A denial is indistinguishable from an unknown target.
    pub async fn execute(
        &self,
        identity: &Identity,
        mut command: Command,
    ) -> Result<CommandResult, CoreError> {
        command::validate(&command, &self.inner.config.policy)?;

        if !self.may_execute(identity, &command) {
            let (kind, key) = command.target();
            debug!(command = %command.kind(), %kind, %key, "command denied");
            return Err(CoreError::not_found(kind, key));
        }

        if let Some(username) = identity.username.clone() {
            match &mut command {
                Command::CreateSilence { request, .. } => request.creator = Some(username),
                Command::CreateStash { request, .. } => {
                    request
                        .content
                        .insert("username".into(), serde_json::Value::String(username));
                }
                _ => {}
            }
        }

        self.dispatch(command).await
    }

    /// Whether `identity` may issue `command`. Read-only identities never
    /// may. A cached target must be actionable, and so must whatever the
    /// payload would write. A subscription-scoped identity is refused when
    /// a client, event or check target is not in the snapshot.
    fn may_execute(&self, identity: &Identity, command: &Command) -> bool {
        let datacenter = command.datacenter();
        if identity.readonly || !authz::is_authorized_for_datacenter(identity, datacenter) {
            return false;
        }

        let (kind, key) = command.target();
        let existing = self.snapshot().get(kind, datacenter, &key);
        if existing
            .as_ref()
            .is_some_and(|object| !authz::can_act_on(identity, object))
        {
            return false;
        }

        match command {
            Command::CreateSilence { request, .. } => {
                let silence = Silence {
                    datacenter: datacenter.to_owned(),
                    id: key,
                    subscription: request.subscription.clone(),
                    check: request.check.clone(),
                    reason: None,
                    creator: None,
                    expire: None,
                    expire_on_resolve: false,
                    extra: Extra::new(),
                };
                authz::can_act_on(identity, &silence)
            }
            Command::UpdateClient { request, .. } => {
                let client = Client {
                    datacenter: datacenter.to_owned(),
                    name: key,
                    address: None,
                    subscriptions: request.subscriptions.clone(),
                    version: None,
                    last_seen: None,
                    extra: Extra::new(),
                };
                authz::can_act_on(identity, &client)
            }
            Command::IssueCheckExecution { request, .. } => {
                let Some(allowed) = &identity.subscriptions else {
                    return true;
                };
                let Some(MonitoringObject::Check(check)) = &existing else {
                    return false;
                };
                // An empty subscriber list runs on every subscriber of the check.
                let targets = if request.subscribers.is_empty() {
                    &check.subscribers
                } else {
                    &request.subscribers
                };
                targets.iter().all(|s| allowed.contains(s))
            }
            _ => {
                existing.is_some()
                    || identity.subscriptions.is_none()
                    || !matches!(kind, ObjectKind::Client | ObjectKind::Event | ObjectKind::Check)
            }
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field(
                "datacenters",
                &self.inner.backends.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            )
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn poll_task(dashboard: Dashboard, interval: std::time::Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // `start` already ran the first cycle

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                dashboard.poll_once().await;
            }
        }
    }
}
