//! HDD activity light show: spins the LEDs while the NAS disk is busy.

mod leds;

pub use leds::*;

use crate::error::{AppError, Result};
use crate::models::DiskCounters;
use crate::system::{diskstats, SystemSampler};
use std::time::Duration;
use tracing::{info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const BLINK_DELAY: Duration = Duration::from_millis(150);
/// Bytes moved per poll above which the show plays.
pub const ACTIVITY_THRESHOLD: u64 = 10 * 1024;
pub const SPIN_REPEATS: usize = 2;

/// Bytes read plus written between two samples. Counter resets count as idle.
pub fn activity_bytes(previous: &DiskCounters, current: &DiskCounters) -> u64 {
    current.read_bytes().saturating_sub(previous.read_bytes())
        + current.write_bytes().saturating_sub(previous.write_bytes())
}

pub fn is_busy(activity: u64) -> bool {
    activity > ACTIVITY_THRESHOLD
}

/// Lights each LED in turn, `repeats` times round.
pub async fn circular_spin(leds: &mut dyn LedBank, repeats: usize) -> Result<()> {
    for _ in 0..repeats {
        for i in 0..leds.len() {
            leds.set(i, true)?;
            tokio::time::sleep(BLINK_DELAY).await;
            leds.set(i, false)?;
        }
    }
    Ok(())
}

/// One poll: compares with `last`, then spins or turns everything off.
async fn poll_once(leds: &mut dyn LedBank, device: &str, last: &mut DiskCounters) -> Result<()> {
    let current = match diskstats::read_device(device) {
        Ok(Some(c)) => c,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!("Reading disk stats failed: {}", e);
            return Ok(());
        },
    };
    let activity = activity_bytes(last, &current);
    *last = current;

    if is_busy(activity) {
        info!("Disk activity detected: {} bytes/s, light show", activity);
        circular_spin(leds, SPIN_REPEATS).await
    } else {
        leds.all_off()
    }
}

/// Runs until Ctrl-C, then switches all LEDs off.
///
/// # Errors
///
/// Fails up front if `mount_point` is not mounted or its device has no I/O counters.
pub async fn run_light_show(leds: &mut dyn LedBank, mount_point: &str) -> Result<()> {
    let device = SystemSampler::new()
        .device_for_mount(mount_point)
        .ok_or_else(|| AppError::Hardware(format!("Could not find device for {}", mount_point)))?;
    info!("Monitoring device: {}", device);

    let mut last = diskstats::read_device(&device)?
        .ok_or_else(|| AppError::Hardware(format!("No IO stats found for device {}", device)))?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Exiting light show");
                break Ok(());
            },
            step = async {
                tokio::time::sleep(POLL_INTERVAL).await;
                poll_once(&mut *leds, &device, &mut last).await
            } => {
                if let Err(e) = step {
                    break Err(e);
                }
            },
        }
    };

    leds.all_off()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(sectors_read: u64, sectors_written: u64) -> DiskCounters {
        DiskCounters {
            reads_completed: 0,
            sectors_read,
            writes_completed: 0,
            sectors_written,
        }
    }

    #[test]
    fn test_activity_counts_read_and_write_bytes() {
        let a = counters(100, 200);
        let b = counters(110, 215);
        assert_eq!(activity_bytes(&a, &b), 25 * 512);
        assert_eq!(activity_bytes(&b, &a), 0, "counter reset");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!is_busy(ACTIVITY_THRESHOLD));
        assert!(is_busy(ACTIVITY_THRESHOLD + 1));
        // 20 sectors is exactly 10 KiB, 21 crosses it
        assert!(!is_busy(activity_bytes(&counters(0, 0), &counters(20, 0))));
        assert!(is_busy(activity_bytes(&counters(0, 0), &counters(0, 21))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_ends_dark() {
        let mut leds = LogLeds::new(4);
        let started = tokio::time::Instant::now();
        circular_spin(&mut leds, 2).await.unwrap();
        assert_eq!(started.elapsed(), BLINK_DELAY * 8);
        assert!(leds.states().iter().all(|s| !s));
    }

    #[tokio::test]
    async fn test_missing_mount_fails() {
        let mut leds = LogLeds::new(4);
        let err = run_light_show(&mut leds, "/definitely/not/mounted")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Hardware Error: Could not find device for /definitely/not/mounted"
        );
    }
}
