//! Command dispatch: loads the config, then hands off to a handler.

pub mod check_config;
pub mod poll;
pub mod run;

use vantage_core::DashboardConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let config = load(global)?;
    match cmd {
        Command::CheckConfig => check_config::handle(&config),
        Command::Poll(args) => poll::handle(config, &args, global).await,
        Command::Run => run::handle(config).await,
    }
}

/// Load the TOML file (plus env overrides) and validate it.
fn load(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let raw = vantage_config::load_config(global.config.as_deref())?;
    let config = raw.to_dashboard_config()?;
    tracing::debug!(
        datacenters = config.registry.datacenters().len(),
        roles = config.registry.roles().len(),
        "configuration loaded"
    );
    Ok(config)
}
