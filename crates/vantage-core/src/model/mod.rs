// ── Unified domain model ──
//
// Canonical, datacenter-tagged representations of everything the
// dashboard serves, plus the caller identity the filter evaluates.

pub mod datacenter;
pub mod identity;
pub mod object;

pub use datacenter::{DatacenterStatus, Health};
pub use identity::{DatacenterScope, Identity};
pub use object::{
    Aggregate, Check, Client, Event, Extra, MonitoringObject, ObjectKind, Resource, Severity,
    Silence, Stash, Subscription,
};
