// ── Command dispatch ──
//
// Relays a validated command to the one datacenter that owns its
// target. No retries and no cache mutation: the change shows up in the
// snapshot after the next poll.

use tracing::{debug, warn};

use vantage_api::models::{CheckRequest, RawClient, RawStash, SilenceRequest};
use vantage_api::SensuClient;

use crate::config::Policy;
use crate::error::CoreError;
use crate::poller::Backend;

use super::{Command, CommandResult, validate};

/// Map a command onto the datacenter API call that carries it out.
async fn route(api: &SensuClient, command: Command) -> Result<(), vantage_api::Error> {
    match command {
        Command::DeleteClient { name, .. } => api.delete_client(&name).await,
        Command::DeleteAggregate { name, .. } => api.delete_aggregate(&name).await,
        Command::DeleteCheckResult { client, check, .. } => {
            api.delete_check_result(&client, &check).await
        }
        Command::ResolveEvent { client, check, .. } => api.resolve_event(&client, &check).await,
        Command::CreateSilence { request, .. } => {
            api.create_silence(&SilenceRequest {
                subscription: request.subscription,
                check: request.check,
                reason: request.reason,
                creator: request.creator,
                expire: request.expire,
                expire_on_resolve: request.expire_on_resolve,
            })
            .await
        }
        Command::ClearSilence { id, .. } => api.clear_silence(&id).await,
        Command::CreateStash { request, .. } => {
            api.create_stash(&RawStash {
                path: request.path,
                content: request.content,
                expire: request.expire,
            })
            .await
        }
        Command::DeleteStash { path, .. } => api.delete_stash(&path).await,
        Command::IssueCheckExecution { request, .. } => {
            api.request_check(&CheckRequest {
                check: request.check,
                subscribers: request.subscribers,
                reason: request.reason,
                creator: None,
            })
            .await
        }
        Command::UpdateClient { request, .. } => {
            api.update_client(&RawClient {
                name: request.name,
                address: request.address,
                subscriptions: request.subscriptions,
                version: None,
                timestamp: None,
                extra: request.extra,
            })
            .await
        }
    }
}

/// Validate `command` and relay it to its datacenter.
///
/// Fails with `InvalidPayload` before any network call, `NotFound` for a
/// datacenter that is not configured, and `DatacenterUnreachable` when
/// the call does not finish within `Policy::dispatch_timeout`.
pub(crate) async fn dispatch(
    backends: &[Backend],
    policy: &Policy,
    command: Command,
) -> Result<CommandResult, CoreError> {
    validate(&command, policy)?;

    let datacenter = command.datacenter().to_owned();
    let Some(backend) = backends.iter().find(|b| b.name == datacenter) else {
        return Err(CoreError::not_found("datacenter", datacenter));
    };

    let kind = command.kind();
    let (target_kind, target_key) = command.target();
    debug!(%datacenter, command = %kind, target = %target_key, "dispatching command");

    match tokio::time::timeout(policy.dispatch_timeout, route(&backend.client, command)).await {
        Ok(Ok(())) => Ok(CommandResult::Accepted { datacenter }),
        Ok(Err(e)) => {
            warn!(%datacenter, command = %kind, error = %e, "command failed");
            Err(CoreError::from_api(&datacenter, target_kind, &target_key, e))
        }
        Err(_) => {
            warn!(%datacenter, command = %kind, "command timed out");
            Err(CoreError::DatacenterUnreachable {
                reason: format!(
                    "no response within {}s",
                    policy.dispatch_timeout.as_secs_f64()
                ),
                datacenter,
            })
        }
    }
}
