//! Small host probes that sysinfo does not cover: SoC temperature and the outbound address.

use std::net::{IpAddr, UdpSocket};
use std::path::Path;
use tracing::debug;

pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Parses a sysfs thermal reading (millidegrees Celsius).
pub fn parse_millidegrees(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().map(|m| m / 1000.0)
}

/// CPU temperature in °C, or 0.0 when the thermal zone cannot be read.
pub fn cpu_temperature() -> f64 {
    cpu_temperature_from(Path::new(THERMAL_ZONE_PATH))
}

pub fn cpu_temperature_from(path: &Path) -> f64 {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse_millidegrees(&raw).unwrap_or(0.0),
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            0.0
        },
    }
}

/// The local IPv4 address used for outbound traffic.
///
/// Connecting a UDP socket only selects a route, no packet is sent.
pub fn outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|a| a.ip())
}

/// Last dotted component of an IPv4 address, `--` when unknown.
pub fn last_octet(ip: Option<IpAddr>) -> String {
    match ip {
        Some(IpAddr::V4(v4)) => v4.octets()[3].to_string(),
        _ => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("48312\n"), Some(48.312));
        assert_eq!(parse_millidegrees("garbage"), None);
    }

    #[test]
    fn test_cpu_temperature_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "51000").unwrap();
        assert_eq!(cpu_temperature_from(file.path()), 51.0);
        assert_eq!(cpu_temperature_from(Path::new("/nonexistent/thermal")), 0.0);
    }

    #[test]
    fn test_last_octet() {
        assert_eq!(last_octet(Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42)))), "42");
        assert_eq!(last_octet(None), "--");
        assert_eq!(last_octet(Some("::1".parse().unwrap())), "--");
    }
}
