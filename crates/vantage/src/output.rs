//! Output formatting: tables via `tabled`, JSON via serde.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use vantage_core::{DatacenterStatus, Health, Metrics};

use crate::cli::ColorMode;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_health(health: Health, color: bool) -> String {
    let label = health.to_string();
    if !color {
        return label;
    }
    match health {
        Health::Reachable => label.green().to_string(),
        Health::Unreachable => label.red().bold().to_string(),
        Health::Unknown => label.yellow().to_string(),
    }
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct HealthRow {
    #[tabled(rename = "Datacenter")]
    datacenter: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Stale")]
    stale: &'static str,
    #[tabled(rename = "Last poll")]
    last_poll: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl HealthRow {
    pub fn new(status: &DatacenterStatus, color: bool) -> Self {
        Self {
            datacenter: status.name.clone(),
            health: paint_health(status.health, color),
            stale: if status.stale { "yes" } else { "no" },
            last_poll: format_time(status.last_poll),
            error: status.last_error.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Count")]
    count: usize,
}

/// Per-kind object counts, then per-severity event counts.
pub fn count_rows(metrics: &Metrics) -> Vec<CountRow> {
    let objects = metrics.objects.iter().map(|(kind, count)| CountRow {
        kind: kind.to_string(),
        count: *count,
    });
    let severities = metrics.events_by_severity.iter().map(|(sev, count)| CountRow {
        kind: format!("events ({sev})"),
        count: *count,
    });
    objects
        .chain(severities)
        .chain(std::iter::once(CountRow {
            kind: "events (silenced)".into(),
            count: metrics.silenced_events,
        }))
        .collect()
}

#[derive(Tabled)]
pub struct DatacenterRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "URL")]
    pub url: String,
    #[tabled(rename = "Auth")]
    pub auth: String,
    #[tabled(rename = "Timeout")]
    pub timeout: String,
}

#[derive(Tabled)]
pub struct RoleRow {
    #[tabled(rename = "Role")]
    pub name: String,
    #[tabled(rename = "Datacenters")]
    pub datacenters: String,
    #[tabled(rename = "Subscriptions")]
    pub subscriptions: String,
    #[tabled(rename = "Read-only")]
    pub readonly: bool,
}

// ── Renderers ────────────────────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) -> io::Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_row_without_color_is_plain() {
        let row = HealthRow::new(&DatacenterStatus::unknown("east"), false);
        assert_eq!(row.health, "unknown");
        assert_eq!(row.last_poll, "-");
        assert_eq!(row.stale, "no");
    }

    #[test]
    fn table_contains_every_row() {
        let rows = vec![
            HealthRow::new(&DatacenterStatus::unknown("east"), false),
            HealthRow::new(&DatacenterStatus::unknown("west"), false),
        ];
        let table = render_table(&rows);
        assert!(table.contains("east"));
        assert!(table.contains("west"));
        assert!(table.contains("Datacenter"));
    }
}
