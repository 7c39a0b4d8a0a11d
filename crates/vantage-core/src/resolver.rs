// ── Cross-datacenter name resolution ──
//
// Requests that name an object without naming its datacenter are
// resolved against the whole snapshot. The same name may exist in
// several datacenters; callers decide what to do with an ambiguity.

use crate::error::CoreError;
use crate::model::{MonitoringObject, ObjectKind};
use crate::store::Snapshot;

/// Outcome of resolving a datacenter-less name.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NotFound,
    Resolved(MonitoringObject),
    /// Two or more datacenters hold an object with this name, in
    /// registry order.
    Ambiguous(Vec<MonitoringObject>),
}

impl Resolution {
    pub(crate) fn from_matches(mut matches: Vec<MonitoringObject>) -> Self {
        match matches.len() {
            0 => Self::NotFound,
            1 => matches.pop().map_or(Self::NotFound, Self::Resolved),
            _ => Self::Ambiguous(matches),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}

/// Every object of `kind` whose key equals `name`, across all datacenters.
///
/// Each match carries its datacenter. An object tagged with an empty or
/// unknown datacenter means the snapshot was built wrong and is reported
/// as `CoreError::Internal`.
pub fn find_by_name(
    snapshot: &Snapshot,
    kind: ObjectKind,
    name: &str,
) -> Result<Vec<MonitoringObject>, CoreError> {
    snapshot
        .list(kind)
        .into_iter()
        .filter(|obj| obj.key() == name)
        .map(|obj| {
            let dc = obj.datacenter();
            if dc.is_empty() || !snapshot.has_datacenter(dc) {
                return Err(CoreError::Internal(format!(
                    "{kind} '{name}' is tagged with unknown datacenter '{dc}'"
                )));
            }
            Ok(obj)
        })
        .collect()
}

/// Resolve `name` to exactly one object if possible.
pub fn resolve(snapshot: &Snapshot, kind: ObjectKind, name: &str) -> Result<Resolution, CoreError> {
    find_by_name(snapshot, kind, name).map(Resolution::from_matches)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::model::{Check, DatacenterStatus, Extra};
    use crate::store::{Collections, DatacenterSlice};

    fn check(dc: &str, name: &str) -> Arc<Check> {
        Arc::new(Check {
            datacenter: dc.into(),
            name: name.into(),
            command: None,
            subscribers: Vec::new(),
            interval: None,
            standalone: false,
            extra: Extra::new(),
        })
    }

    fn slice(status_dc: &str, checks: Vec<Arc<Check>>) -> DatacenterSlice {
        DatacenterSlice {
            status: DatacenterStatus::reachable(status_dc, Utc::now()),
            data: Arc::new(Collections {
                checks,
                ..Collections::default()
            }),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            1,
            Utc::now(),
            vec![
                slice("east", vec![check("east", "check_cpu"), check("east", "check_disk")]),
                slice("west", vec![check("west", "check_disk")]),
            ],
        )
    }

    #[test]
    fn single_match_resolves() {
        let res = resolve(&snapshot(), ObjectKind::Check, "check_cpu").unwrap();
        match res {
            Resolution::Resolved(obj) => assert_eq!(obj.datacenter(), "east"),
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[test]
    fn shared_name_is_ambiguous_in_registry_order() {
        let matches = find_by_name(&snapshot(), ObjectKind::Check, "check_disk").unwrap();
        let dcs: Vec<_> = matches.iter().map(MonitoringObject::datacenter).collect();
        assert_eq!(dcs, vec!["east", "west"]);
        assert!(resolve(&snapshot(), ObjectKind::Check, "check_disk")
            .unwrap()
            .is_ambiguous());
    }

    #[test]
    fn unknown_name_and_wrong_kind_are_not_found() {
        assert_eq!(
            resolve(&snapshot(), ObjectKind::Check, "check_mem").unwrap(),
            Resolution::NotFound
        );
        assert!(find_by_name(&snapshot(), ObjectKind::Client, "check_cpu")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn object_with_unknown_datacenter_is_internal_error() {
        let snap = Snapshot::new(
            1,
            Utc::now(),
            vec![slice("east", vec![check("", "check_cpu")])],
        );
        let err = find_by_name(&snap, ObjectKind::Check, "check_cpu").unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
