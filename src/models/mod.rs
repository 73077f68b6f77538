//! Defines the data structures and models used throughout the application.
//!
//! This includes structures representing data fetched from the weather API,
//! metrics read from the host, and results used for panel or terminal display.

mod system;
mod weather;

pub use system::*;
pub use weather::*;
