//! `check` -- one quality pass over the fleet, report only.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use plcwatch_core::QualityReport;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Serializable per-device view for JSON output.
#[derive(Serialize)]
struct CheckView {
    host: String,
    healthy: bool,
    report: Option<QualityReport>,
    error: Option<String>,
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "RX Mbps")]
    rx_mbps: String,
    #[tabled(rename = "TX Mbps")]
    tx_mbps: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let mut supervisor = super::build_supervisor(global, None, None)?;
    let outcomes = supervisor.check_once().await;

    let color = output::should_color();
    let views: Vec<CheckView> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(report) => CheckView {
                host: outcome.host,
                healthy: report.is_healthy(),
                report: Some(report),
                error: None,
            },
            Err(error) => CheckView {
                host: outcome.host,
                healthy: false,
                report: None,
                error: Some(error.to_string()),
            },
        })
        .collect();

    let rendered = output::render_list(
        &global.output,
        &views,
        |view| to_row(view, color),
        |view| format!("{}\t{}", view.host, plain_status(view)),
    );
    output::print_output(&rendered, global.quiet);

    Ok(())
}

fn to_row(view: &CheckView, color: bool) -> CheckRow {
    match &view.report {
        Some(report) => CheckRow {
            host: view.host.clone(),
            device: report.device_name.clone(),
            rx_mbps: report.master_rx_mbps.to_string(),
            tx_mbps: report.master_tx_mbps.to_string(),
            uptime: format_uptime(report.uptime_secs),
            status: status_cell(report, color),
        },
        None => CheckRow {
            host: view.host.clone(),
            device: "-".into(),
            rx_mbps: "-".into(),
            tx_mbps: "-".into(),
            uptime: "-".into(),
            status: error_cell(view.error.as_deref().unwrap_or("unknown error"), color),
        },
    }
}

fn status_cell(report: &QualityReport, color: bool) -> String {
    if report.is_healthy() {
        if color {
            "healthy".green().to_string()
        } else {
            "healthy".to_owned()
        }
    } else {
        let detail = report.issues.join("; ");
        if color {
            format!("{} ({detail})", "degraded".yellow())
        } else {
            format!("degraded ({detail})")
        }
    }
}

fn error_cell(message: &str, color: bool) -> String {
    if color {
        format!("{} ({message})", "unreachable".red())
    } else {
        format!("unreachable ({message})")
    }
}

fn plain_status(view: &CheckView) -> &'static str {
    match &view.report {
        Some(report) if report.is_healthy() => "healthy",
        Some(_) => "degraded",
        None => "unreachable",
    }
}

/// Render seconds as `3d 04:05:06` style uptime.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
