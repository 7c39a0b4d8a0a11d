//! `check-config`: validate the file and list what it defines.

use vantage_core::{DashboardConfig, DatacenterScope};

use crate::error::CliError;
use crate::output::{self, DatacenterRow, RoleRow};

pub fn handle(config: &DashboardConfig) -> Result<(), CliError> {
    let policy = &config.policy;

    let datacenters: Vec<DatacenterRow> = config
        .registry
        .datacenters()
        .iter()
        .map(|dc| DatacenterRow {
            name: dc.name.clone(),
            url: dc.url.to_string(),
            auth: dc
                .credentials
                .as_ref()
                .map_or_else(|| "none".into(), |c| format!("basic ({})", c.username)),
            timeout: format!("{}s", dc.timeout.unwrap_or(policy.poll_timeout).as_secs()),
        })
        .collect();

    let roles: Vec<RoleRow> = config
        .registry
        .roles()
        .iter()
        .map(|role| RoleRow {
            name: role.name.clone(),
            datacenters: match &role.datacenters {
                DatacenterScope::All => "*".into(),
                DatacenterScope::Only(names) => names.iter().cloned().collect::<Vec<_>>().join(", "),
            },
            subscriptions: role.subscriptions.as_ref().map_or_else(
                || "*".into(),
                |subs| subs.iter().cloned().collect::<Vec<_>>().join(", "),
            ),
            readonly: role.readonly,
        })
        .collect();

    output::print_output(&output::render_table(&datacenters))?;
    if !roles.is_empty() {
        output::print_output(&output::render_table(&roles))?;
    }
    output::print_output(&format!(
        "refresh every {}s, poll timeout {}s, dispatch timeout {}s",
        policy.refresh_interval.as_secs(),
        policy.poll_timeout.as_secs(),
        policy.dispatch_timeout.as_secs(),
    ))?;
    Ok(())
}
