use super::{Flow, Screen, ScreenContext};
use crate::display::Frame;
use crate::system::uptime::format_pretty;
use std::time::Duration;

#[derive(Default)]
pub struct UptimeScreen {
    text: Option<String>,
}

impl UptimeScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for UptimeScreen {
    fn title(&self) -> &'static str {
        "Show Uptime"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_secs(10)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        self.text = Some(format_pretty(ctx.sampler.uptime_secs()));
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        let mut lines = vec!["System Uptime:".to_string()];
        lines.extend(self.text.iter().cloned());
        frame.text_lines(&lines, false);
        frame
    }
}
