//! `poll`: one poll cycle, then a health and count report.

use serde::Serialize;

use vantage_core::{Dashboard, DashboardConfig, HealthReport, Metrics};

use crate::cli::{GlobalOpts, OutputFormat, PollArgs};
use crate::error::CliError;
use crate::output::{self, HealthRow};

#[derive(Serialize)]
struct PollReport {
    health: HealthReport,
    metrics: Metrics,
}

pub async fn handle(
    config: DashboardConfig,
    args: &PollArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dashboard = Dashboard::new(config)?;
    dashboard.poll_once().await;

    let report = PollReport {
        health: dashboard.health_report(),
        metrics: dashboard.metrics(),
    };

    let rendered = match args.output {
        OutputFormat::Json => output::render_json(&report)?,
        OutputFormat::Table => {
            let color = output::should_color(global.color);
            let health: Vec<HealthRow> = report
                .health
                .datacenters
                .values()
                .map(|status| HealthRow::new(status, color))
                .collect();
            format!(
                "{}\n{}",
                output::render_table(&health),
                output::render_table(&output::count_rows(&report.metrics)),
            )
        }
    };
    output::print_output(&rendered)?;

    let total = report.metrics.datacenters_total;
    let reachable = report.metrics.datacenters_reachable;
    if reachable < total {
        return Err(CliError::Unreachable {
            unreachable: total - reachable,
            total,
        });
    }
    Ok(())
}
