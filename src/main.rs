mod api;
mod app;
mod cli;
mod config;
mod display;
mod error;
mod input;
mod lights;
mod models;
mod screens;
mod system;

use anyhow::Context;
use clap::Parser;
use cli::{App, Cli, Commands, SmartArgs};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use std::env;
use app::menu::service_label;
use system::SystemAction;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr (stdout belongs to the simulated display), plus a daily file when
/// `NAS_PANEL_LOG_DIR` is set. The returned guard flushes the file on drop.
fn init_logging(default_level: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match env::var("NAS_PANEL_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "nas-panel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        },
        Err(_) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Without the Pi drivers there is nothing but the simulator
    let simulate = cli.simulate || !cfg!(feature = "rpi");

    // Keep the simulated panel readable unless asked for more
    let default_level = match (&cli.command, simulate) {
        (Some(Commands::Run), true) => "warn",
        _ => "info",
    };
    let _log_guard = init_logging(default_level);

    info!("Starting nas-panel (simulate: {})", simulate);

    let app = App::new(simulate).context("Failed to load configuration")?;

    if let Some(command) = cli.command {
        let name = format!("{:?}", command);
        return app
            .run_command(command)
            .await
            .with_context(|| format!("Command {} failed", name));
    }

    println!("{}", "NAS panel console".cyan().bold());

    // Service restarts follow the configured units, like the panel menu
    let services = app.config().services.clone();
    let mut options: Vec<String> = vec![
        "Show Uptime".to_string(),
        "Load Average".to_string(),
        "Disk Space".to_string(),
        "SMART Status".to_string(),
        "Weather".to_string(),
    ];
    let first_service = options.len();
    options.extend(services.iter().map(|unit| format!("Restart {}", service_label(unit))));
    let exit = options.len();
    options.push("Exit".to_string());

    // Main interactive loop
    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact_opt()?
            .unwrap_or(exit); // Default to Exit if cancelled

        println!();

        let command_result = match selection {
            0 => app.run_command(Commands::Uptime).await,
            1 => app.run_command(Commands::Load).await,
            2 => app.run_command(Commands::Disks).await,
            3 => {
                app.run_command(Commands::Smart(SmartArgs { device: None }))
                    .await
            },
            4 => app.run_command(Commands::Weather).await,
            i if i == exit => {
                println!("{}", "Bye!".green());
                break;
            },
            i => {
                let action = SystemAction::RestartService(services[i - first_service].clone());
                match cli::confirm_action(&action.to_string()) {
                    Ok(true) => app.run_action(action).await,
                    Ok(false) => {
                        println!("{}", "Cancelled".yellow());
                        continue;
                    },
                    Err(e) => {
                        println!("{} {}", "Failed to get input:".red(), e);
                        continue;
                    },
                }
            },
        };

        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!();
    }

    Ok(())
}
