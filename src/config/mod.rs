//! Runtime configuration for the panel and the light show.
//!
//! Values come from the process environment (optionally seeded from a `.env` file)
//! and fall back to defaults matching the reference hardware build.

mod settings;

pub use settings::*;
