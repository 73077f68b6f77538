//! Reads drive health through `smartctl`.

use crate::error::{AppError, Result};
use crate::models::{SmartHealth, SmartReport};
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::{debug, warn};

const HEALTH_MARKER: &str = "SMART overall-health self-assessment test result";

/// Extracts health and the displayed attributes from `smartctl -a` output.
///
/// Attribute values are taken from the last whitespace-separated field (RAW_VALUE).
pub fn parse_report(output: &str) -> SmartReport {
    let mut report = SmartReport::default();
    for line in output.lines() {
        if line.contains(HEALTH_MARKER) {
            if line.contains("PASSED") {
                report.health = SmartHealth::Passed;
            } else if line.contains("FAILED") {
                report.health = SmartHealth::Failed;
            }
        } else if line.contains("Temperature_Celsius") || line.contains("Temperature_Internal") {
            if let Some(v) = last_field(line) {
                report.temperature = v;
            }
        } else if line.contains("Reallocated_Sector_Ct") {
            if let Some(v) = last_field(line) {
                report.reallocated = v;
            }
        } else if line.contains("Power_On_Hours") {
            if let Some(v) = last_field(line) {
                report.power_on_hours = v;
            }
        }
    }
    report
}

fn last_field(line: &str) -> Option<String> {
    line.split_whitespace().last().map(str::to_string)
}

/// Runs `smartctl -a <device>` (through sudo when asked) and parses the result.
///
/// smartctl encodes drive warnings in its exit status bits, so a non-zero exit is
/// only treated as an error when the output lacks the health verdict.
///
/// # Errors
///
/// Returns `AppError::Command` with `smartctl not found` when the binary is missing,
/// or with the exit status when the read failed.
pub async fn read_report(device: &str, use_sudo: bool) -> Result<SmartReport> {
    let mut cmd = if use_sudo {
        let mut c = Command::new("sudo");
        c.arg("smartctl");
        c
    } else {
        Command::new("smartctl")
    };
    // A dropped read (the screen closed) must not leave smartctl running
    cmd.args(["-a", device]).kill_on_drop(true);

    let output = cmd.output().await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AppError::Command("smartctl not found".to_string())
        } else {
            AppError::Command(format!("failed to start smartctl: {}", e))
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        if stdout.contains(HEALTH_MARKER) {
            debug!("smartctl exited with {} but produced a report", output.status);
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("smartctl failed for {}: {} {}", device, output.status, stderr.trim());
            if stderr.contains("command not found") || stderr.contains("smartctl: not found") {
                return Err(AppError::Command("smartctl not found".to_string()));
            }
            return Err(AppError::Command(format!("smartctl {}", output.status)));
        }
    }

    Ok(parse_report(&stdout))
}
