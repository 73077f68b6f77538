//! 12-hour clock with a blinking separator.

use super::{Flow, Screen, ScreenContext};
use crate::display::{Font, Frame, HEIGHT};
use chrono::{NaiveDateTime, Timelike};
use std::time::Duration;

#[derive(Default)]
pub struct ClockScreen {
    local: Option<NaiveDateTime>,
}

impl ClockScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `h:MM:SS AM` with the colons blanked on odd seconds.
pub fn time_line(t: &NaiveDateTime) -> String {
    let sep = if t.second() % 2 == 0 { ":" } else { " " };
    format!(
        "{}{sep}{}{sep}{} {}",
        t.format("%-I"),
        t.format("%M"),
        t.format("%S"),
        t.format("%p"),
        sep = sep
    )
}

pub fn date_line(t: &NaiveDateTime) -> String {
    t.format("%b %d, %Y").to_string()
}

impl Screen for ClockScreen {
    fn title(&self) -> &'static str {
        "Show Clock"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(100)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        self.local = Some(ctx.moment.local);
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        let Some(t) = self.local.as_ref() else {
            return frame;
        };
        let line_h = Font::Small.line_height();
        let top = (HEIGHT - (line_h + 4 + line_h)) / 2;
        frame.text_centered(top, &date_line(t), Font::Small, true);
        frame.text_centered(top + line_h + 4, &time_line(t), Font::Small, true);
        frame
    }
}
