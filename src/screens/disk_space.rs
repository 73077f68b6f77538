//! Usage bars for up to three mounted partitions.

use super::{Flow, Screen, ScreenContext};
use crate::display::{Font, Frame, HEIGHT, WIDTH};
use crate::models::PartitionUsage;
use std::time::Duration;

const MAX_PARTITIONS: usize = 3;
const LABEL_CHARS: usize = 20;
const BAR_HEIGHT: i32 = 8;
const SPACING: i32 = 4;

#[derive(Default)]
pub struct DiskSpaceScreen {
    partitions: Vec<PartitionUsage>,
}

impl DiskSpaceScreen {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_partitions(partitions: Vec<PartitionUsage>) -> Self {
        Self { partitions }
    }
}

/// `device (mount)` trimmed to what fits on one line.
pub fn partition_label(p: &PartitionUsage) -> String {
    format!("{} ({})", p.device, p.mount_point)
        .chars()
        .take(LABEL_CHARS)
        .collect()
}

impl Screen for DiskSpaceScreen {
    fn title(&self) -> &'static str {
        "Disk Space"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_secs(10)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        self.partitions = ctx.sampler.partitions();
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        if self.partitions.is_empty() {
            frame.text(10, 28, "No drives found", Font::Small, true);
            return frame;
        }

        let mut y = 0;
        for p in self.partitions.iter().take(MAX_PARTITIONS) {
            frame.text(0, y, &partition_label(p), Font::Small, true);
            y += 9;

            frame.outline_rect(0, y, WIDTH - 1, y + BAR_HEIGHT, Some(false));
            let fill_width = (WIDTH as f64 * (p.percent / 100.0)) as i32;
            if fill_width > 0 {
                frame.fill_rect(0, y, fill_width, y + BAR_HEIGHT, true);
            }

            let text = format!("{:.0}%", p.percent);
            let text_w = Font::Small.text_width(&text);
            let text_x = (WIDTH - text_w) / 2;
            let text_y = y + (BAR_HEIGHT - Font::Small.line_height()) / 2;
            // Dark text where the bar is already filled behind it
            let over_fill = (text_x + text_w / 2) < fill_width;
            frame.text(text_x, text_y, &text, Font::Small, !over_fill);

            y += BAR_HEIGHT + SPACING;
            if y > HEIGHT - 8 {
                break;
            }
        }
        frame
    }
}
