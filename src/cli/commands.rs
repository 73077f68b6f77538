use super::report::{
    print_partitions, print_smart, print_uptime, spinner, status_table, weather_line,
};
use crate::api::{OpenMeteoClient, WeatherLocation};
use crate::app;
use crate::config::{Config, LED_PINS};
use crate::error::Result;
use crate::lights::{self, LedBank, LogLeds};
use crate::system::{services, smart, SystemAction, SystemSampler};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::{error, info};

/// Front panel, light show and status tools for a Raspberry Pi NAS
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use the terminal as the display, the keyboard as the knob and log the LEDs
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Without a subcommand an interactive menu is shown
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the OLED menu, screens and idle dashboard
    Run,

    /// Spin the activity LEDs while the NAS disk is busy
    Lights,

    /// Print system metrics
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the SMART health summary of a drive
    Smart(SmartArgs),

    /// Print the current weather and the next hours
    Weather,

    /// Print the system uptime
    Uptime,

    /// Print the load averages
    Load,

    /// Print usage of the mounted drives
    Disks,

    /// Restart a systemd service
    Restart(RestartArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SmartArgs {
    /// Device to query (defaults to NAS_PANEL_SMART_DEVICE)
    #[arg(short, long)]
    pub device: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RestartArgs {
    /// systemd unit name, e.g. smbd
    pub unit: String,
}

/// CLI application
pub struct App {
    config: Config,
    simulate: bool,
}

impl App {
    /// Loads the configuration. Simulation always implies a dry run for privileged commands.
    pub fn new(simulate: bool) -> Result<Self> {
        let mut config = Config::load()?;
        if simulate {
            config.dry_run = true;
        }
        info!(
            "Configuration loaded (simulate: {}, dry run: {})",
            simulate, config.dry_run
        );
        Ok(Self { config, simulate })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one command to completion
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run => app::run_panel(&self.config, self.simulate).await?,
            Commands::Lights => self.run_lights().await?,
            Commands::Status { json } => self.show_status(json)?,
            Commands::Smart(args) => {
                let device = args.device.unwrap_or_else(|| self.config.smart_device.clone());
                self.show_smart(&device).await?;
            },
            Commands::Weather => self.show_weather().await?,
            Commands::Uptime => print_uptime(SystemSampler::new().uptime_secs()),
            Commands::Load => {
                let load = SystemSampler::new().load_average();
                println!(
                    "{} {:.2} {:.2} {:.2}",
                    "Load (1/5/15):".cyan(),
                    load.one,
                    load.five,
                    load.fifteen
                );
            },
            Commands::Disks => print_partitions(&SystemSampler::new().partitions()),
            Commands::Restart(args) => {
                self.run_action(SystemAction::RestartService(args.unit))
                    .await?
            },
        }

        Ok(())
    }

    async fn run_lights(&self) -> Result<()> {
        println!(
            "{}",
            "Starting NAS Activity Light Show. Press Ctrl+C to stop.".cyan()
        );
        let mut leds = self.open_leds()?;
        lights::run_light_show(leds.as_mut(), &self.config.nas_mount).await
    }

    fn open_leds(&self) -> Result<Box<dyn LedBank>> {
        if self.simulate {
            return Ok(Box::new(LogLeds::new(LED_PINS.len())));
        }
        #[cfg(feature = "rpi")]
        {
            Ok(Box::new(lights::GpioLeds::open(&LED_PINS)?))
        }
        #[cfg(not(feature = "rpi"))]
        {
            Err(crate::error::AppError::Hardware(
                "LED output needs the `rpi` feature; use --simulate".to_string(),
            ))
        }
    }

    fn show_status(&self, json: bool) -> Result<()> {
        let snapshot = SystemSampler::new().snapshot(&self.config.net_iface);
        if json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", status_table(&snapshot));
        }
        Ok(())
    }

    async fn show_smart(&self, device: &str) -> Result<()> {
        let pb = spinner(&format!("Running smartctl on {}", device))?;
        let result = smart::read_report(device, self.config.use_sudo).await;
        pb.finish_and_clear();
        let report = result?;
        print_smart(device, &report);
        Ok(())
    }

    async fn show_weather(&self) -> Result<()> {
        let client = OpenMeteoClient::with_base_url(&self.config.weather_url)?;
        let location = WeatherLocation {
            latitude: self.config.latitude,
            longitude: self.config.longitude,
            timezone: self.config.timezone.clone(),
        };
        let pb = spinner("Fetching weather")?;
        let result = client.get_current_weather(&location).await;
        pb.finish_and_clear();
        let report = result?;
        println!("{} {}", "Weather:".cyan(), weather_line(&report));
        Ok(())
    }

    /// Runs a privileged action with a spinner.
    pub async fn run_action(&self, action: SystemAction) -> Result<()> {
        let pb = spinner(&format!("{}...", action.progress_label()))?;
        let result = services::run(&action, self.config.use_sudo, self.config.dry_run).await;
        pb.finish_and_clear();
        match &result {
            Ok(()) if self.config.dry_run => {
                println!("{} {}", "Dry run, skipped:".yellow(), action)
            },
            Ok(()) => println!("{} {}", "Done:".green(), action),
            Err(e) => error!("{} failed: {}", action, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["nas-panel", "status", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Status { json: true })));
        assert!(!cli.simulate);

        let cli = Cli::parse_from(["nas-panel", "smart", "--device", "/dev/sdb", "--simulate"]);
        assert!(cli.simulate);
        match cli.command {
            Some(Commands::Smart(args)) => assert_eq!(args.device.as_deref(), Some("/dev/sdb")),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["nas-panel", "--simulate", "restart", "smbd"]);
        match cli.command {
            Some(Commands::Restart(args)) => assert_eq!(args.unit, "smbd"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_interactive() {
        let cli = Cli::parse_from(["nas-panel"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_simulated_leds_are_logged() {
        let app = App {
            config: Config::default(),
            simulate: true,
        };
        let leds = app.open_leds().unwrap();
        assert_eq!(leds.len(), LED_PINS.len());
    }

    #[tokio::test]
    async fn test_dry_run_action_succeeds() {
        let app = App {
            config: Config {
                dry_run: true,
                ..Config::default()
            },
            simulate: true,
        };
        app.run_action(SystemAction::RestartService("smbd".to_string()))
            .await
            .unwrap();
    }
}
