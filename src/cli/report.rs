//! Terminal output for the one-shot commands.

use crate::error::Result;
use crate::models::{PartitionUsage, SmartHealth, SmartReport, SystemSnapshot, WeatherReport};
use crate::system::uptime::format_pretty;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{BinaryBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner on stderr with `message`, ticking until finished.
pub fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn usage_cell(percent: f64) -> Cell {
    let cell = Cell::new(format!("{:.1}%", percent));
    match percent {
        p if p >= 90.0 => cell.fg(Color::Red),
        p if p >= 75.0 => cell.fg(Color::Yellow),
        _ => cell.fg(Color::Green),
    }
}

/// Two-column metric table followed by one row per partition.
pub fn status_table(s: &SystemSnapshot) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    table.add_row(vec![Cell::new("Hostname"), Cell::new(&s.hostname)]);
    table.add_row(vec![Cell::new("Uptime"), Cell::new(format_pretty(s.uptime_secs))]);
    table.add_row(vec![
        Cell::new("Load (1/5/15)"),
        Cell::new(format!("{:.2} {:.2} {:.2}", s.load.one, s.load.five, s.load.fifteen)),
    ]);
    table.add_row(vec![Cell::new("RAM"), usage_cell(s.memory_percent)]);
    table.add_row(vec![Cell::new("CPU temp"), Cell::new(format!("{:.1} °C", s.cpu_temp_c))]);
    table.add_row(vec![
        Cell::new("IP"),
        Cell::new(s.ip_address.as_deref().unwrap_or("--")),
    ]);
    let net = match &s.net {
        Some(n) => format!(
            "rx {} / tx {}",
            BinaryBytes(n.received),
            BinaryBytes(n.transmitted)
        ),
        None => "interface not found".to_string(),
    };
    table.add_row(vec![Cell::new(format!("Network ({})", s.net_iface)), Cell::new(net)]);

    for p in &s.partitions {
        table.add_row(vec![Cell::new(partition_name(p)), usage_cell(p.percent)]);
    }
    table
}

fn partition_name(p: &PartitionUsage) -> String {
    format!(
        "{} on {} ({} free)",
        p.device,
        p.mount_point,
        BinaryBytes(p.available_bytes)
    )
}

pub fn print_smart(device: &str, report: &SmartReport) {
    let health = match report.health {
        SmartHealth::Passed => report.health.to_string().green().bold(),
        SmartHealth::Failed => report.health.to_string().red().bold(),
        SmartHealth::Unknown => report.health.to_string().yellow().bold(),
    };
    println!("{} {}", format!("SMART health for {}:", device).cyan(), health);
    println!("  Temperature:      {} C", report.temperature);
    println!("  Power-on hours:   {}", report.power_on_hours);
    println!("  Reallocated:      {}", report.reallocated);
    if report.health != SmartHealth::Passed {
        println!("{}", "Drive may be failing!".red());
    }
}

/// `72°F sun, next hours: 71° 70° 69°`
pub fn weather_line(report: &WeatherReport) -> String {
    let forecast: Vec<String> = report.forecast_f.iter().map(|t| format!("{:.0}°", t)).collect();
    format!(
        "{:.0}°F {}, next hours: {}",
        report.temp_f,
        report.condition.label(),
        forecast.join(" ")
    )
}

pub fn print_uptime(secs: u64) {
    println!("{} {}", "System Uptime:".cyan(), format_pretty(secs));
}

pub fn print_partitions(partitions: &[PartitionUsage]) {
    if partitions.is_empty() {
        println!("{}", "No drives found".yellow());
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Device", "Mount", "Used", "Free"]);
    for p in partitions {
        table.add_row(vec![
            Cell::new(&p.device),
            Cell::new(&p.mount_point),
            usage_cell(p.percent),
            Cell::new(BinaryBytes(p.available_bytes).to_string()),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoadAverage, NetTotals, WeatherCondition};

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            hostname: "nas".to_string(),
            uptime_secs: 90_061,
            load: LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 0.1,
            },
            memory_percent: 42.0,
            cpu_temp_c: 51.2,
            ip_address: Some("192.168.1.20".to_string()),
            net_iface: "eth0".to_string(),
            net: Some(NetTotals {
                received: 3 * 1024 * 1024,
                transmitted: 512,
            }),
            partitions: vec![PartitionUsage {
                device: "/dev/sda1".to_string(),
                mount_point: "/srv/nas".to_string(),
                percent: 91.0,
                total_bytes: 1000,
                available_bytes: 90,
            }],
        }
    }

    #[test]
    fn test_status_table_rows() {
        let rendered = status_table(&snapshot()).to_string();
        assert!(rendered.contains("up 1 day, 1 hour, 1 minute"));
        assert!(rendered.contains("0.50 0.25 0.10"));
        assert!(rendered.contains("rx 3.00 MiB / tx 512 B"));
        assert!(rendered.contains("/dev/sda1 on /srv/nas"));
        assert!(rendered.contains("91.0%"));
    }

    #[test]
    fn test_missing_interface_row() {
        let s = SystemSnapshot {
            net: None,
            ip_address: None,
            ..snapshot()
        };
        let rendered = status_table(&s).to_string();
        assert!(rendered.contains("interface not found"));
        assert!(rendered.contains("--"));
    }

    #[test]
    fn test_weather_line() {
        let report = WeatherReport {
            temp_f: 71.6,
            condition: WeatherCondition::Rain,
            forecast_f: vec![70.2, 69.0],
        };
        assert_eq!(weather_line(&report), "72°F rain, next hours: 70° 69°");
    }

    #[test]
    fn test_partition_name_uses_binary_units() {
        let p = PartitionUsage {
            device: "/dev/sdb1".to_string(),
            mount_point: "/srv/media".to_string(),
            percent: 50.0,
            total_bytes: 10 * 1024 * 1024 * 1024,
            available_bytes: 5 * 1024 * 1024 * 1024,
        };
        assert_eq!(partition_name(&p), "/dev/sdb1 on /srv/media (5.00 GiB free)");
    }
}
