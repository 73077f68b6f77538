//! Service restarts and power control.

use crate::error::{AppError, Result};
use std::fmt;
use tokio::process::Command;
use tracing::{error, info};

/// A privileged action reachable from the panel menu or the terminal menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemAction {
    /// `systemctl restart <unit>`
    RestartService(String),
    PowerOff,
    Reboot,
}

impl SystemAction {
    /// The argv to execute, including the `sudo` prefix when requested.
    pub fn command_line(&self, use_sudo: bool) -> Vec<String> {
        let mut argv: Vec<String> = Vec::new();
        if use_sudo {
            argv.push("sudo".to_string());
        }
        match self {
            SystemAction::RestartService(unit) => {
                argv.extend(["systemctl".to_string(), "restart".to_string(), unit.clone()]);
            },
            SystemAction::PowerOff => argv.push("poweroff".to_string()),
            SystemAction::Reboot => argv.push("reboot".to_string()),
        }
        argv
    }

    /// Short text for the panel while the action runs.
    pub fn progress_label(&self) -> String {
        match self {
            SystemAction::RestartService(unit) => format!("Restarting {}", unit),
            SystemAction::PowerOff => "Powering off".to_string(),
            SystemAction::Reboot => "Rebooting".to_string(),
        }
    }
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemAction::RestartService(unit) => write!(f, "restart {}", unit),
            SystemAction::PowerOff => f.write_str("power off"),
            SystemAction::Reboot => f.write_str("reboot"),
        }
    }
}

/// Executes `action`, or only logs it when `dry_run` is set.
///
/// # Errors
///
/// Returns `AppError::Command` if the program cannot be started or exits non-zero.
pub async fn run(action: &SystemAction, use_sudo: bool, dry_run: bool) -> Result<()> {
    let argv = action.command_line(use_sudo);
    if dry_run {
        info!("Dry run, not executing: {}", argv.join(" "));
        return Ok(());
    }

    info!("Executing: {}", argv.join(" "));
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| AppError::Command("empty command line".to_string()))?;

    let output = Command::new(program).args(args).output().await.map_err(|e| {
        error!("Failed to start {}: {}", program, e);
        AppError::Command(format!("{}: {}", program, e))
    })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("{} failed with {}: {}", argv.join(" "), output.status, stderr.trim());
        let reason = stderr
            .lines()
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| output.status.to_string());
        Err(AppError::Command(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        let restart = SystemAction::RestartService("smbd".to_string());
        assert_eq!(
            restart.command_line(true),
            vec!["sudo", "systemctl", "restart", "smbd"]
        );
        assert_eq!(restart.command_line(false), vec!["systemctl", "restart", "smbd"]);
        assert_eq!(SystemAction::PowerOff.command_line(true), vec!["sudo", "poweroff"]);
        assert_eq!(SystemAction::Reboot.command_line(false), vec!["reboot"]);
    }

    #[tokio::test]
    async fn test_dry_run_never_executes() {
        let result = run(&SystemAction::Reboot, true, true).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            SystemAction::RestartService("jellyfin".to_string()).progress_label(),
            "Restarting jellyfin"
        );
        assert_eq!(SystemAction::PowerOff.to_string(), "power off");
    }
}
