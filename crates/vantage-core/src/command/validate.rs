// ── Local command validation ──
//
// Runs before any network call. Every failure is `InvalidPayload`.

use crate::config::Policy;
use crate::error::CoreError;

use super::{Command, CreateSilenceRequest};

fn require(value: &str, what: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::invalid(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn validate_silence(request: &CreateSilenceRequest, policy: &Policy) -> Result<(), CoreError> {
    if is_blank(request.subscription.as_deref()) && is_blank(request.check.as_deref()) {
        return Err(CoreError::invalid(
            "a silence needs a subscription or a check",
        ));
    }
    if policy.require_silencing_reason && is_blank(request.reason.as_deref()) {
        return Err(CoreError::invalid(
            "a reason must be provided for every silence entry",
        ));
    }
    if policy.disable_no_expiration
        && request.expire.is_none_or(|e| e < 1)
        && !request.expire_on_resolve
    {
        return Err(CoreError::invalid(
            "open-ended silence entries are disallowed",
        ));
    }
    Ok(())
}

/// Check `command` against its own shape and the dashboard policy.
pub(crate) fn validate(command: &Command, policy: &Policy) -> Result<(), CoreError> {
    require(command.datacenter(), "datacenter")?;

    match command {
        Command::DeleteClient { name, .. } => require(name, "client name"),
        Command::DeleteAggregate { name, .. } => require(name, "aggregate name"),
        Command::DeleteCheckResult { client, check, .. }
        | Command::ResolveEvent { client, check, .. } => {
            require(client, "client name")?;
            require(check, "check name")
        }
        Command::ClearSilence { id, .. } => require(id, "silence id"),
        Command::CreateSilence { request, .. } => validate_silence(request, policy),
        Command::CreateStash { request, .. } => require(&request.path, "stash path"),
        Command::DeleteStash { path, .. } => require(path, "stash path"),
        Command::IssueCheckExecution { request, .. } => require(&request.check, "check name"),
        Command::UpdateClient { request, .. } => require(&request.name, "client name"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::CreateStashRequest;

    fn silence(request: CreateSilenceRequest) -> Command {
        Command::CreateSilence {
            datacenter: "east".into(),
            request,
        }
    }

    #[test]
    fn silence_without_subscription_or_check_is_rejected() {
        let err = validate(&silence(CreateSilenceRequest::default()), &Policy::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload { .. }));
    }

    #[test]
    fn reason_required_by_policy() {
        let policy = Policy {
            require_silencing_reason: true,
            ..Policy::default()
        };
        let mut request = CreateSilenceRequest {
            check: Some("check_disk".into()),
            reason: Some("   ".into()),
            ..CreateSilenceRequest::default()
        };
        assert!(validate(&silence(request.clone()), &policy).is_err());

        request.reason = Some("maintenance".into());
        assert!(validate(&silence(request), &policy).is_ok());
    }

    #[test]
    fn open_ended_silence_rejected_when_disabled() {
        let policy = Policy {
            disable_no_expiration: true,
            ..Policy::default()
        };
        let base = CreateSilenceRequest {
            subscription: Some("linux".into()),
            ..CreateSilenceRequest::default()
        };

        assert!(validate(&silence(base.clone()), &policy).is_err());
        assert!(
            validate(
                &silence(CreateSilenceRequest {
                    expire: Some(0),
                    ..base.clone()
                }),
                &policy
            )
            .is_err()
        );
        assert!(
            validate(
                &silence(CreateSilenceRequest {
                    expire: Some(3600),
                    ..base.clone()
                }),
                &policy
            )
            .is_ok()
        );
        assert!(
            validate(
                &silence(CreateSilenceRequest {
                    expire_on_resolve: true,
                    ..base
                }),
                &policy
            )
            .is_ok()
        );
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let policy = Policy::default();
        let bad = [
            Command::DeleteClient {
                datacenter: "east".into(),
                name: String::new(),
            },
            Command::ResolveEvent {
                datacenter: "east".into(),
                client: "web-01".into(),
                check: String::new(),
            },
            Command::CreateStash {
                datacenter: "east".into(),
                request: CreateStashRequest::default(),
            },
            Command::DeleteAggregate {
                datacenter: String::new(),
                name: "web".into(),
            },
        ];
        for cmd in &bad {
            assert!(validate(cmd, &policy).is_err(), "{cmd:?} should be rejected");
        }
    }
}
