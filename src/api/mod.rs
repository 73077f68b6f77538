//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `open_meteo`: Client for the Open-Meteo forecast API.
//! - `refresher`: Background task and cache that keep the dashboard weather current.

mod open_meteo;
mod open_meteo_test;
mod refresher;

pub use open_meteo::*;
pub use refresher::*;
