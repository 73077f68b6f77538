//! Data structures describing the host: metrics snapshots, partitions, disk counters
//! and SMART health.

use serde::Serialize;
use std::fmt;

/// Usage of one mounted partition, as shown on the Disk Space screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionUsage {
    /// Device path, e.g. `/dev/sda1`.
    pub device: String,
    pub mount_point: String,
    /// Used space in percent (0-100).
    pub percent: f64,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Per-device counters from `/proc/diskstats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiskCounters {
    pub reads_completed: u64,
    pub sectors_read: u64,
    pub writes_completed: u64,
    pub sectors_written: u64,
}

/// Sector size used by `/proc/diskstats`, independent of the device's real sector size.
pub const DISKSTATS_SECTOR_BYTES: u64 = 512;

impl DiskCounters {
    pub fn read_bytes(&self) -> u64 {
        self.sectors_read * DISKSTATS_SECTOR_BYTES
    }

    pub fn write_bytes(&self) -> u64 {
        self.sectors_written * DISKSTATS_SECTOR_BYTES
    }
}

/// 1, 5 and 15 minute load averages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Cumulative byte counters for one network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NetTotals {
    pub received: u64,
    pub transmitted: u64,
}

impl NetTotals {
    pub fn total(&self) -> u64 {
        self.received + self.transmitted
    }
}

/// Everything the `status` command prints.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub hostname: String,
    pub uptime_secs: u64,
    pub load: LoadAverage,
    pub memory_percent: f64,
    pub cpu_temp_c: f64,
    pub ip_address: Option<String>,
    pub net_iface: String,
    pub net: Option<NetTotals>,
    pub partitions: Vec<PartitionUsage>,
}

// --- SMART ---

/// Overall health verdict reported by `smartctl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SmartHealth {
    Passed,
    Failed,
    Unknown,
}

impl fmt::Display for SmartHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SmartHealth::Passed => "PASSED",
            SmartHealth::Failed => "FAILED",
            SmartHealth::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Value shown for an attribute the drive did not report.
pub const SMART_MISSING: &str = "?";

/// The handful of SMART attributes the panel displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartReport {
    pub health: SmartHealth,
    pub temperature: String,
    pub reallocated: String,
    pub power_on_hours: String,
}

impl Default for SmartReport {
    fn default() -> Self {
        Self {
            health: SmartHealth::Unknown,
            temperature: SMART_MISSING.to_string(),
            reallocated: SMART_MISSING.to_string(),
            power_on_hours: SMART_MISSING.to_string(),
        }
    }
}

impl SmartReport {
    /// Text lines for the panel: details when healthy, a warning otherwise.
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("SMART Status: {}", self.health)];
        if self.health == SmartHealth::Passed {
            lines.push(format!("Temp: {} C", self.temperature));
            lines.push(format!("Hours: {}", self.power_on_hours));
            lines.push(format!("Realloc: {}", self.reallocated));
        } else {
            lines.push("Drive may be failing!".to_string());
        }
        lines
    }
}
