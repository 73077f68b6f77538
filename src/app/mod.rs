//! The panel service: menu, screens and idle dashboard on the OLED.
//!
//! `run_panel` wires the output device, the input source and the weather refresher
//! to a `Controller` and drives it from a single event loop.

pub mod controller;
pub mod dashboard;
pub mod menu;
pub mod runtime;

use crate::api::{spawn_weather_refresher, OpenMeteoClient, WeatherLocation};
use crate::config::Config;
use crate::display::{Panel, TerminalPanel};
use crate::error::Result;
use crate::input::{input_channel, spawn_keyboard_input, InputSender};
use controller::{Controller, PanelScreens, Timing};
use dashboard::SystemView;
use menu::{menu_items, Menu};
use std::time::Instant;
use tracing::info;

fn open_panel(config: &Config, simulate: bool) -> Result<Box<dyn Panel>> {
    if simulate {
        info!("Using terminal panel");
        return Ok(Box::new(TerminalPanel::stdout()));
    }
    #[cfg(feature = "rpi")]
    {
        use crate::display::{RppalI2c, Ssd1306};
        info!("Opening SSD1306 at 0x{:02X}", config.i2c_address);
        let bus = RppalI2c::open(config.i2c_address)?;
        Ok(Box::new(Ssd1306::new(bus)?))
    }
    #[cfg(not(feature = "rpi"))]
    {
        let _ = config;
        Err(crate::error::AppError::Hardware(
            "built without the `rpi` feature; use --simulate".to_string(),
        ))
    }
}

fn start_input(tx: InputSender, simulate: bool) -> Result<()> {
    if simulate {
        info!("Keys: arrows or a/d rotate, Enter confirms, Backspace goes back, Space is the knob, q quits");
        spawn_keyboard_input(tx);
        return Ok(());
    }
    #[cfg(feature = "rpi")]
    {
        crate::input::spawn_gpio_input(tx)?;
        Ok(())
    }
    #[cfg(not(feature = "rpi"))]
    {
        drop(tx);
        Err(crate::error::AppError::Hardware(
            "GPIO input needs the `rpi` feature".to_string(),
        ))
    }
}

/// Runs the panel until Ctrl-C (or `q` in the simulator).
pub async fn run_panel(config: &Config, simulate: bool) -> Result<()> {
    let mut panel = open_panel(config, simulate)?;

    let (tx, rx) = input_channel();
    start_input(tx, simulate)?;

    let client = OpenMeteoClient::with_base_url(&config.weather_url)?;
    let location = WeatherLocation {
        latitude: config.latitude,
        longitude: config.longitude,
        timezone: config.timezone.clone(),
    };
    let (weather, refresher) = spawn_weather_refresher(client, location, config.weather_interval);

    let mut controller = Controller::new(
        Menu::new(menu_items(config)),
        PanelScreens::from_config(config),
        Timing::from(config),
        SystemView::new(&config.net_iface, &config.disk_device),
        weather,
        Instant::now(),
    );

    info!(
        "Panel running (idle timeout {:?}, dry run {})",
        config.idle_timeout, config.dry_run
    );
    let result = runtime::run_event_loop(panel.as_mut(), &mut controller, rx).await;
    refresher.abort();
    result
}
