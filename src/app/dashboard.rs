//! The idle dashboard: a system overview and a weather card.

use crate::display::{cut_corner_box, Font, Frame};
use crate::models::{WeatherCondition, WeatherReport};
use crate::screens::{LoadHistory, ScreenContext};
use crate::system::{diskstats, host, DiskActivity};
use chrono::NaiveDateTime;
use std::time::Instant;
use tracing::debug;

const LOAD_HISTORY_LEN: usize = 50;
const LOAD_GRAPH_POINTS: usize = 36;
const LOAD_GRAPH_MAX_H: f64 = 12.0;

/// kbps needed for one, two and three lit network bars.
pub const NET_BAR_THRESHOLDS: [f64; 3] = [50.0, 150.0, 400.0];

/// Number of network bars to fill for a given throughput.
pub fn net_bars(kbps: f64) -> usize {
    NET_BAR_THRESHOLDS.iter().filter(|t| kbps > **t).count()
}

/// Throughput from successive cumulative byte counters.
#[derive(Debug, Default)]
pub struct NetMeter {
    last: Option<(u64, Instant)>,
}

impl NetMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// KiB per second since the previous sample. The first sample, a missing interface
    /// or a counter reset reads as zero.
    pub fn kbps(&mut self, total_bytes: Option<u64>, now: Instant) -> f64 {
        let Some(total) = total_bytes else {
            return 0.0;
        };
        let previous = self.last.replace((total, now));
        match previous {
            Some((bytes, at)) if total >= bytes => {
                let secs = now.saturating_duration_since(at).as_secs_f64();
                if secs <= 0.0 {
                    0.0
                } else {
                    (total - bytes) as f64 / secs / 1024.0
                }
            },
            _ => 0.0,
        }
    }
}

/// Everything drawn on the system view besides the load graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemReadings {
    pub local: NaiveDateTime,
    pub cpu_temp: f64,
    pub ram_percent: f64,
    pub ip_octet: String,
    pub net_bars: usize,
    pub disk_active: bool,
}

pub fn render_system(readings: &SystemReadings, history: &LoadHistory) -> Frame {
    let mut frame = Frame::new();
    let t = &readings.local;

    // Time, big
    frame.text(0, -4, &t.format("%H").to_string(), Font::Large, true);
    frame.text(0, 22, &t.format("%M").to_string(), Font::Large, true);
    frame.fill_rect(0, 46, 44, 64, true);
    frame.text(2, 48, &t.format("%b").to_string(), Font::Medium, false);
    frame.text(28, 48, &t.format("%d").to_string(), Font::Medium, false);

    cut_corner_box(&mut frame, 46, 0, 127, 28, "CPU");
    frame.text(88, 2, &format!("IP {}", readings.ip_octet), Font::Small, true);
    frame.text(50, 14, &format!("{:>4.1}°", readings.cpu_temp), Font::Small, true);

    let (base_x, base_y) = (90, 27);
    for (i, v) in history.tail(LOAD_GRAPH_POINTS).enumerate() {
        let h = (v / 2.0 * LOAD_GRAPH_MAX_H).min(LOAD_GRAPH_MAX_H) as i32;
        let x = base_x + i as i32;
        frame.line(x, base_y, x, base_y - h, true);
    }

    // Shown in tens of percent so it fits next to the tab
    cut_corner_box(&mut frame, 46, 34, 127, 62, "RAM");
    frame.text(50, 48, &format!("{:>4.1}", readings.ram_percent / 10.0), Font::Small, true);

    let (base_x, base_y) = (113, 59);
    for i in 0..3 {
        let x1 = base_x + i as i32 * 4;
        let y1 = base_y - (i as i32 + 1) * 2;
        frame.outline_rect(x1, y1 - 2, x1 + 3, base_y, Some(i < readings.net_bars));
    }

    frame.outline_rect(44, 60, 49, 63, Some(readings.disk_active));
    frame
}

/// Draws the condition icon with its top-left corner at `(x, y)`.
pub fn draw_weather_icon(frame: &mut Frame, x: i32, y: i32, condition: WeatherCondition) {
    match condition {
        WeatherCondition::Sun => frame.ellipse(x, y, x + 20, y + 20, true),
        WeatherCondition::Rain => {
            frame.ellipse(x, y, x + 20, y + 12, false);
            for i in 0..3 {
                frame.line(x + 5 + i * 5, y + 12, x + 3 + i * 5, y + 18, true);
            }
        },
        WeatherCondition::Snow => {
            for i in 0..6 {
                let dx = (i % 3 - 1) * 6;
                let dy = (i / 3 - 1) * 6;
                frame.line(x + 10, y + 6, x + 10 + dx, y + 6 + dy, true);
            }
        },
        WeatherCondition::Storm => {
            // Bolt outline (6,6) (10,6) (8,14) (12,14) (6,22), split into triangles
            frame.fill_triangle((x + 6, y + 6), (x + 10, y + 6), (x + 8, y + 14), true);
            frame.fill_triangle((x + 6, y + 6), (x + 8, y + 14), (x + 6, y + 22), true);
            frame.fill_triangle((x + 8, y + 14), (x + 12, y + 14), (x + 6, y + 22), true);
        },
        WeatherCondition::Cloud => frame.ellipse(x + 2, y + 6, x + 22, y + 18, true),
    }
}

pub fn render_weather(report: &WeatherReport) -> Frame {
    let mut frame = Frame::new();
    frame.text(10, 5, &format!("{:.0}°F", report.temp_f), Font::Temperature, true);
    draw_weather_icon(&mut frame, 90, 12, report.condition);

    for (i, t) in report.forecast_f.iter().enumerate() {
        frame.text(10 + i as i32 * 30, 48, &format!("{:.0}°", t), Font::Small, true);
    }
    frame
}

/// Sampling state behind the system view. Every draw takes a fresh sample.
pub struct SystemView {
    net_iface: String,
    disk_device: String,
    history: LoadHistory,
    disk: DiskActivity,
    net: NetMeter,
}

impl SystemView {
    pub fn new(net_iface: &str, disk_device: &str) -> Self {
        Self {
            net_iface: net_iface.to_string(),
            disk_device: disk_device.to_string(),
            history: LoadHistory::new(LOAD_HISTORY_LEN),
            disk: DiskActivity::new(),
            net: NetMeter::new(),
        }
    }

    pub fn sample(&mut self, ctx: &mut ScreenContext<'_>) -> SystemReadings {
        self.history.push(ctx.sampler.load_average().one);

        let counters = diskstats::read_device(&self.disk_device).unwrap_or_else(|e| {
            debug!("Disk counters unavailable: {}", e);
            None
        });
        let disk_active = self.disk.update(counters);

        let net_total = ctx.sampler.net_totals(&self.net_iface).map(|n| n.total());
        let kbps = self.net.kbps(net_total, ctx.moment.now);

        SystemReadings {
            local: ctx.moment.local,
            cpu_temp: host::cpu_temperature(),
            ram_percent: ctx.sampler.memory_percent(),
            ip_octet: host::last_octet(host::outbound_ip()),
            net_bars: net_bars(kbps),
            disk_active,
        }
    }

    /// Samples and draws in one go.
    pub fn draw(&mut self, ctx: &mut ScreenContext<'_>) -> Frame {
        let readings = self.sample(ctx);
        render_system(&readings, &self.history)
    }
}
