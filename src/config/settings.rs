//! Environment-driven settings (`NAS_PANEL_*` variables).

use crate::error::{AppError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

// --- Hardware wiring (BCM numbering) ---

/// Rotary encoder channel A.
pub const ENCODER_PIN_A: u8 = 27;
/// Rotary encoder channel B.
pub const ENCODER_PIN_B: u8 = 22;
/// Confirm push button.
pub const BUTTON_CONFIRM_PIN: u8 = 5;
/// Back push button.
pub const BUTTON_BACK_PIN: u8 = 23;
/// Push switch built into the encoder knob.
pub const BUTTON_KNOB_PIN: u8 = 17;
/// Activity LEDs, in spin order.
pub const LED_PINS: [u8; 4] = [20, 21, 13, 26];

const ENV_PREFIX: &str = "NAS_PANEL_";

/// All tunables used by the panel, the light show and the one-shot commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Network interface whose throughput drives the dashboard bars.
    pub net_iface: String,
    /// Block device name (as in `/proc/diskstats`) for the dashboard disk LED.
    pub disk_device: String,
    /// Device path passed to `smartctl`.
    pub smart_device: String,
    /// Mount point watched by the light show.
    pub nas_mount: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Base URL of the Open-Meteo API (no trailing path).
    pub weather_url: String,
    pub weather_interval: Duration,
    /// Time on the main menu without input before the dashboard takes over.
    pub idle_timeout: Duration,
    /// Time each dashboard view stays up before sliding to the other one.
    pub dashboard_cycle: Duration,
    /// Prefix privileged commands with `sudo`.
    pub use_sudo: bool,
    /// Log privileged commands instead of executing them.
    pub dry_run: bool,
    pub i2c_address: u16,
    /// systemd units offered for restart, in menu order.
    pub services: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            net_iface: "eth0".to_string(),
            disk_device: "sda".to_string(),
            smart_device: "/dev/sda".to_string(),
            nas_mount: "/srv/nas".to_string(),
            latitude: 29.8922,
            longitude: -81.3139,
            timezone: "America/New_York".to_string(),
            weather_url: crate::api::BASE_URL.to_string(),
            weather_interval: Duration::from_secs(600),
            idle_timeout: Duration::from_secs(30),
            dashboard_cycle: Duration::from_secs(15),
            use_sudo: true,
            dry_run: false,
            i2c_address: 0x3C,
            services: vec!["jellyfin".to_string(), "smbd".to_string()],
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and builds a `Config` from the environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Builds a `Config` from `NAS_PANEL_*` variables, using defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            net_iface: string_var("NET_IFACE", defaults.net_iface),
            disk_device: string_var("DISK_DEVICE", defaults.disk_device),
            smart_device: string_var("SMART_DEVICE", defaults.smart_device),
            nas_mount: string_var("NAS_MOUNT", defaults.nas_mount),
            latitude: parsed_var("LATITUDE", defaults.latitude)?,
            longitude: parsed_var("LONGITUDE", defaults.longitude)?,
            timezone: string_var("TIMEZONE", defaults.timezone),
            weather_url: string_var("WEATHER_URL", defaults.weather_url)
                .trim_end_matches('/')
                .to_string(),
            weather_interval: secs_var("WEATHER_INTERVAL_SECS", defaults.weather_interval)?,
            idle_timeout: secs_var("IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            dashboard_cycle: secs_var("DASHBOARD_CYCLE_SECS", defaults.dashboard_cycle)?,
            use_sudo: bool_var("USE_SUDO", defaults.use_sudo)?,
            dry_run: bool_var("DRY_RUN", defaults.dry_run)?,
            i2c_address: address_var("I2C_ADDRESS", defaults.i2c_address)?,
            services: list_var("SERVICES", defaults.services),
        };

        if !(-90.0..=90.0).contains(&config.latitude) {
            return Err(AppError::Config(format!(
                "{}LATITUDE out of range: {}",
                ENV_PREFIX, config.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&config.longitude) {
            return Err(AppError::Config(format!(
                "{}LONGITUDE out of range: {}",
                ENV_PREFIX, config.longitude
            )));
        }

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

// --- Variable helpers ---

fn raw_var(name: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, name))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_var(name: &str, default: String) -> String {
    raw_var(name).unwrap_or(default)
}

fn parsed_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw_var(name) {
        Some(value) => value.parse::<T>().map_err(|e| {
            AppError::Config(format!("{}{}={:?}: {}", ENV_PREFIX, name, value, e))
        }),
        None => Ok(default),
    }
}

fn secs_var(name: &str, default: Duration) -> Result<Duration> {
    let secs: u64 = parsed_var(name, default.as_secs())?;
    if secs == 0 {
        return Err(AppError::Config(format!(
            "{}{} must be greater than zero",
            ENV_PREFIX, name
        )));
    }
    Ok(Duration::from_secs(secs))
}

fn bool_var(name: &str, default: bool) -> Result<bool> {
    match raw_var(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(AppError::Config(format!(
                "{}{} expects a boolean, got {:?}",
                ENV_PREFIX, name, other
            ))),
        },
    }
}

/// Accepts decimal (`60`) or hex (`0x3C`) I2C addresses.
fn address_var(name: &str, default: u16) -> Result<u16> {
    let Some(value) = raw_var(name) else {
        return Ok(default);
    };
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(AppError::Config(format!(
            "{}{} is not a 7-bit address: {:#x}",
            ENV_PREFIX, name, addr
        ))),
        Err(e) => Err(AppError::Config(format!(
            "{}{}={:?}: {}",
            ENV_PREFIX, name, value, e
        ))),
    }
}

fn list_var(name: &str, default: Vec<String>) -> Vec<String> {
    match raw_var(name) {
        Some(value) => value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 15] = [
        "NET_IFACE",
        "DISK_DEVICE",
        "SMART_DEVICE",
        "NAS_MOUNT",
        "LATITUDE",
        "LONGITUDE",
        "TIMEZONE",
        "WEATHER_URL",
        "WEATHER_INTERVAL_SECS",
        "IDLE_TIMEOUT_SECS",
        "DASHBOARD_CYCLE_SECS",
        "USE_SUDO",
        "DRY_RUN",
        "I2C_ADDRESS",
        "SERVICES",
    ];

    fn clear_env() {
        for name in ALL_VARS {
            env::remove_var(format!("{}{}", ENV_PREFIX, name));
        }
    }

    fn set(name: &str, value: &str) {
        env::set_var(format!("{}{}", ENV_PREFIX, name), value);
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
        assert_eq!(config.i2c_address, 0x3C);
        assert_eq!(config.services, vec!["jellyfin", "smbd"]);
    }

    #[test]
    #[serial]
    fn test_overrides_are_applied() {
        clear_env();
        set("NET_IFACE", "wlan0");
        set("LATITUDE", "52.37");
        set("USE_SUDO", "no");
        set("I2C_ADDRESS", "0x3d");
        set("SERVICES", "jellyfin, smbd ,nfs-server,");
        set("WEATHER_URL", "http://localhost:1234/");
        set("IDLE_TIMEOUT_SECS", "45");

        let config = Config::from_env().unwrap();
        assert_eq!(config.net_iface, "wlan0");
        assert!((config.latitude - 52.37).abs() < f64::EPSILON);
        assert!(!config.use_sudo);
        assert_eq!(config.i2c_address, 0x3D);
        assert_eq!(config.services, vec!["jellyfin", "smbd", "nfs-server"]);
        assert_eq!(config.weather_url, "http://localhost:1234");
        assert_eq!(config.idle_timeout, Duration::from_secs(45));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();
        set("LATITUDE", "north");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        clear_env();
        set("LONGITUDE", "200");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        clear_env();
        set("DRY_RUN", "maybe");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        clear_env();
        set("IDLE_TIMEOUT_SECS", "0");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        clear_env();
        set("I2C_ADDRESS", "0x1FF");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_values_fall_back_to_defaults() {
        clear_env();
        set("NET_IFACE", "   ");
        let config = Config::from_env().unwrap();
        assert_eq!(config.net_iface, "eth0");
        clear_env();
    }
}
