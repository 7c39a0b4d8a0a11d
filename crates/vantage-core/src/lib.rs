//! Aggregation core between `vantage-api` and the dashboard's HTTP layer.
//!
//! This crate owns the unified view over several independently operated
//! monitoring datacenters:
//!
//! - **[`Dashboard`]**: Central facade. [`start()`](Dashboard::start) runs a
//!   first poll and spawns the background poller;
//!   [`poll_once()`](Dashboard::poll_once) runs a single cycle for one-shot
//!   use. Reads, filtering and writes all go through it.
//!
//! - **[`SnapshotCache`]**: The current [`Snapshot`] behind an
//!   `arc_swap::ArcSwap`. Readers get a consistent `Arc<Snapshot>` without
//!   locking; the poller publishes a new one per cycle.
//!
//! - **[`resolver`]**: Finds objects by name when the caller does not
//!   know which datacenter owns them, and reports ambiguity.
//!
//! - **[`authz`]**: Deny-by-default visibility rules over datacenters and
//!   subscriptions. Denials look exactly like absence.
//!
//! - **[`Command`]**: Typed write requests, validated locally and relayed
//!   to the owning datacenter.
//!
//! - **Domain model** ([`model`]): Datacenter-tagged `Check`, `Client`,
//!   `Event`, `Aggregate`, `Stash`, `Silence` and `Subscription` types.

pub mod authz;
pub mod command;
pub mod config;
mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
mod poller;
pub mod resolver;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandKind, CommandResult};
pub use config::{
    Credentials, DashboardConfig, DatacenterConfig, Policy, Registry, RoleConfig,
    TlsVerification,
};
pub use dashboard::{Dashboard, HealthReport};
pub use error::CoreError;
pub use resolver::Resolution;
pub use store::{Metrics, Snapshot, SnapshotCache};

// ── Model re-exports ────────────────────────────────────────────────
pub use model::{
    Aggregate, Check, Client, DatacenterScope, DatacenterStatus, Event, Health, Identity,
    MonitoringObject, ObjectKind, Resource, Severity, Silence, Stash, Subscription,
};
