//! `run`: keep polling in the background until Ctrl-C.

use tracing::{info, warn};

use vantage_core::{Dashboard, DashboardConfig};

use crate::error::CliError;

pub async fn handle(config: DashboardConfig) -> Result<(), CliError> {
    let dashboard = Dashboard::new(config)?;
    let mut generations = dashboard.subscribe_generations();

    dashboard.start().await;
    log_health(&dashboard);

    loop {
        tokio::select! {
            changed = generations.changed() => {
                if changed.is_err() {
                    break;
                }
                log_health(&dashboard);
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupt received, shutting down");
                break;
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn log_health(dashboard: &Dashboard) {
    let report = dashboard.health_report();
    let metrics = dashboard.metrics();
    for status in report.datacenters.values().filter(|s| !s.is_reachable()) {
        warn!(
            datacenter = %status.name,
            stale = status.stale,
            error = status.last_error.as_deref().unwrap_or(""),
            "datacenter unreachable"
        );
    }
    info!(
        generation = report.generation,
        reachable = metrics.datacenters_reachable,
        total = metrics.datacenters_total,
        objects = metrics.objects.values().sum::<usize>(),
        "snapshot published"
    );
}
