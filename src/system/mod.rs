//! Everything read from or done to the host: metrics, disk counters, SMART,
//! uptime text and privileged service/power commands.

pub mod diskstats;
pub mod host;
mod sampler;
pub mod services;
pub mod smart;
pub mod uptime;

pub use sampler::*;
pub use diskstats::DiskActivity;
pub use services::SystemAction;
