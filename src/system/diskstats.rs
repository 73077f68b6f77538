//! Parsing of `/proc/diskstats` and the blink tracker behind the dashboard disk LED.

use crate::error::Result;
use crate::models::DiskCounters;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const DISKSTATS_PATH: &str = "/proc/diskstats";

/// Parses the contents of `/proc/diskstats` into counters keyed by device name.
///
/// Each line starts with `major minor name reads merged sectors_read ms writes merged sectors_written`.
/// Lines with fewer fields or non-numeric counters are skipped.
pub fn parse(contents: &str) -> HashMap<String, DiskCounters> {
    let mut out = HashMap::new();
    for line in contents.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        let num = |i: usize| fields[i].parse::<u64>().ok();
        let (Some(reads), Some(sectors_read), Some(writes), Some(sectors_written)) =
            (num(3), num(5), num(7), num(9))
        else {
            debug!("Skipping malformed diskstats line: {:?}", line);
            continue;
        };
        out.insert(
            fields[2].to_string(),
            DiskCounters {
                reads_completed: reads,
                sectors_read,
                writes_completed: writes,
                sectors_written,
            },
        );
    }
    out
}

/// Reads and parses a diskstats file.
pub fn read_from(path: &Path) -> Result<HashMap<String, DiskCounters>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse(&contents))
}

/// Counters for a single device from `/proc/diskstats`, if it is listed.
pub fn read_device(device: &str) -> Result<Option<DiskCounters>> {
    Ok(read_from(Path::new(DISKSTATS_PATH))?.remove(device))
}

/// Number of draws the disk LED stays lit after activity.
pub const BLINK_DRAWS: u8 = 3;

/// Turns successive counter samples into an on/off LED with a short hold time.
#[derive(Debug, Default)]
pub struct DiskActivity {
    last: Option<(u64, u64)>,
    blink: u8,
    active: bool,
}

impl DiskActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample (or `None` when the device is missing) and returns whether the LED is lit.
    pub fn update(&mut self, sample: Option<DiskCounters>) -> bool {
        if let Some(c) = sample {
            if let Some((reads, writes)) = self.last {
                if c.reads_completed > reads || c.writes_completed > writes {
                    self.active = true;
                    self.blink = BLINK_DRAWS;
                }
            }
            self.last = Some((c.reads_completed, c.writes_completed));
        }
        if self.blink > 0 {
            self.blink -= 1;
        } else {
            self.active = false;
        }
        self.active
    }
}
