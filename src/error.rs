//! `AppError`, the error type shared by the panel, the light show and the CLI.
//!
//! Foreign errors that are not `Clone` sit behind an `Arc`, so an error can be kept in
//! screen state (SMART, actions) and rendered more than once.

use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// The weather request failed or returned a non-success status.
    #[error("API Error: {0}")]
    Api(Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// A `NAS_PANEL_*` value was set but unusable.
    #[error("Config Error: {0}")]
    Config(String),

    /// Reading `/proc`, `/sys` or the terminal.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Display, buttons, encoder or LEDs are missing or refused an operation.
    #[error("Hardware Error: {0}")]
    Hardware(String),

    /// smartctl, systemctl, poweroff or reboot could not run or exited non-zero.
    #[error("Command Error: {0}")]
    Command(String),

    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// A spinner template did not parse.
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Api(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

// rppal errors only carry a message worth showing on the panel
#[cfg(feature = "rpi")]
impl From<rppal::gpio::Error> for AppError {
    fn from(err: rppal::gpio::Error) -> Self {
        AppError::Hardware(format!("GPIO: {}", err))
    }
}

#[cfg(feature = "rpi")]
impl From<rppal::i2c::Error> for AppError {
    fn from(err: rppal::i2c::Error) -> Self {
        AppError::Hardware(format!("I2C: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_cloneable_and_prefixed() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "no diskstats").into();
        let copy = err.clone();
        assert_eq!(copy.to_string(), "I/O Error: no diskstats");
        assert!(matches!(err, AppError::Io(_)));
    }
}
