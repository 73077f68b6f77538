//! Host metrics backed by `sysinfo`.

use super::host;
use crate::models::{LoadAverage, NetTotals, PartitionUsage, SystemSnapshot};
use std::collections::HashSet;
use std::path::Path;
use sysinfo::{Disks, Networks, System};
use tracing::debug;

/// A mounted filesystem before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedDisk {
    pub device: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Drops pseudo and boot mounts and repeated devices, then computes usage.
///
/// Skipped: loop devices, `/boot`, anything under `/boot/firmware`, mount points that
/// no longer exist (as decided by `mount_exists`) and zero-sized filesystems.
///
/// Usage is `(total - available) / total`. `sysinfo` reports no free-block count, so
/// root-reserved blocks count as used and the figure runs a few points above `df`
/// on ext4 volumes.
pub fn filter_partitions<F>(disks: Vec<MountedDisk>, mount_exists: F) -> Vec<PartitionUsage>
where
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for d in disks {
        if d.device.contains("loop")
            || d.mount_point == "/boot"
            || d.mount_point.starts_with("/boot/firmware")
            || !mount_exists(&d.mount_point)
        {
            continue;
        }
        if !seen.insert(d.device.clone()) {
            continue;
        }
        if d.total_bytes == 0 {
            continue;
        }
        let used = d.total_bytes.saturating_sub(d.available_bytes);
        out.push(PartitionUsage {
            percent: used as f64 / d.total_bytes as f64 * 100.0,
            device: d.device,
            mount_point: d.mount_point,
            total_bytes: d.total_bytes,
            available_bytes: d.available_bytes,
        });
    }
    out
}

/// Basename of the device mounted at `mount_point`, e.g. `sda1` for `/dev/sda1`.
pub fn device_for_mount(disks: &[MountedDisk], mount_point: &str) -> Option<String> {
    disks
        .iter()
        .find(|d| d.mount_point == mount_point)
        .and_then(|d| Path::new(&d.device).file_name())
        .map(|n| n.to_string_lossy().into_owned())
}

/// Owns the sysinfo handles so repeated samples only refresh what changed.
pub struct SystemSampler {
    system: System,
    networks: Networks,
    disks: Disks,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
        }
    }

    /// Used RAM in percent.
    pub fn memory_percent(&mut self) -> f64 {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return 0.0;
        }
        self.system.used_memory() as f64 / total as f64 * 100.0
    }

    pub fn load_average(&self) -> LoadAverage {
        let l = System::load_average();
        LoadAverage {
            one: l.one,
            five: l.five,
            fifteen: l.fifteen,
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        System::uptime()
    }

    /// Cumulative byte counters for `iface`, `None` if it does not exist.
    pub fn net_totals(&mut self, iface: &str) -> Option<NetTotals> {
        self.networks.refresh();
        self.networks.list().get(iface).map(|data| NetTotals {
            received: data.total_received(),
            transmitted: data.total_transmitted(),
        })
    }

    /// Every mounted disk sysinfo knows about, freshly listed.
    pub fn mounted_disks(&mut self) -> Vec<MountedDisk> {
        self.disks.refresh_list();
        self.disks
            .list()
            .iter()
            .map(|d| MountedDisk {
                device: d.name().to_string_lossy().into_owned(),
                mount_point: d.mount_point().to_string_lossy().into_owned(),
                total_bytes: d.total_space(),
                available_bytes: d.available_space(),
            })
            .collect()
    }

    /// Partitions worth showing on the Disk Space screen.
    pub fn partitions(&mut self) -> Vec<PartitionUsage> {
        let disks = self.mounted_disks();
        filter_partitions(disks, |m| Path::new(m).exists())
    }

    pub fn device_for_mount(&mut self, mount_point: &str) -> Option<String> {
        let disks = self.mounted_disks();
        let device = device_for_mount(&disks, mount_point);
        debug!("Device for {}: {:?}", mount_point, device);
        device
    }

    /// Collects everything printed by the `status` command.
    pub fn snapshot(&mut self, net_iface: &str) -> SystemSnapshot {
        SystemSnapshot {
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            uptime_secs: self.uptime_secs(),
            load: self.load_average(),
            memory_percent: self.memory_percent(),
            cpu_temp_c: host::cpu_temperature(),
            ip_address: host::outbound_ip().map(|ip| ip.to_string()),
            net_iface: net_iface.to_string(),
            net: self.net_totals(net_iface),
            partitions: self.partitions(),
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(device: &str, mount: &str, total: u64, available: u64) -> MountedDisk {
        MountedDisk {
            device: device.to_string(),
            mount_point: mount.to_string(),
            total_bytes: total,
            available_bytes: available,
        }
    }

    #[test]
    fn test_filter_partitions() {
        let disks = vec![
            disk("/dev/mmcblk0p2", "/", 100, 75),
            disk("/dev/mmcblk0p1", "/boot/firmware", 100, 50),
            disk("/dev/mmcblk0p3", "/boot", 100, 50),
            disk("/dev/loop0", "/snap/core", 100, 0),
            disk("/dev/sda1", "/srv/nas", 1000, 100),
            disk("/dev/sda1", "/srv/nas-bind", 1000, 100),
            disk("/dev/sdb1", "/mnt/gone", 1000, 100),
            disk("/dev/sdc1", "/mnt/empty", 0, 0),
        ];
        let parts = filter_partitions(disks, |m| m != "/mnt/gone");

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].device, "/dev/mmcblk0p2");
        assert!((parts[0].percent - 25.0).abs() < 1e-9);
        assert_eq!(parts[1].mount_point, "/srv/nas");
        assert!((parts[1].percent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reserved_space_counts_as_used() {
        // 1000 blocks, 400 used by files, 50 reserved, 550 available to users
        let parts = filter_partitions(vec![disk("/dev/sda1", "/srv/nas", 1000, 550)], |_| true);
        assert!((parts[0].percent - 45.0).abs() < 1e-9);
        assert_eq!(parts[0].available_bytes, 550);
    }

    #[test]
    fn test_device_for_mount() {
        let disks = vec![
            disk("/dev/mmcblk0p2", "/", 1, 1),
            disk("/dev/sda1", "/srv/nas", 1, 1),
        ];
        assert_eq!(device_for_mount(&disks, "/srv/nas").as_deref(), Some("sda1"));
        assert_eq!(device_for_mount(&disks, "/media/usb"), None);
    }
}
