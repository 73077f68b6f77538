//! Scrolling 1-minute load average graph.

use super::{Flow, Screen, ScreenContext};
use crate::display::{Font, Frame, HEIGHT, WIDTH};
use std::collections::VecDeque;
use std::time::Duration;

pub const LOAD_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);
/// Graph height in pixels at the current maximum.
const GRAPH_HEIGHT: f64 = 40.0;

/// Bounded history of load samples, one graph column each.
#[derive(Debug, Clone)]
pub struct LoadHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LoadHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// The last `n` samples, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        self.samples
            .iter()
            .skip(self.samples.len().saturating_sub(n))
            .copied()
    }

    /// Pixels per load unit so the largest sample (at least 1.0) fills the graph.
    pub fn scale(&self) -> f64 {
        let max = self.iter().fold(1.0_f64, f64::max);
        GRAPH_HEIGHT / max
    }
}

pub struct LoadScreen {
    history: LoadHistory,
}

impl Default for LoadScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadScreen {
    pub fn new() -> Self {
        Self {
            history: LoadHistory::new(WIDTH as usize),
        }
    }

    #[cfg(test)]
    pub fn push_sample(&mut self, value: f64) {
        self.history.push(value);
    }
}

impl Screen for LoadScreen {
    fn title(&self) -> &'static str {
        "Load Average"
    }

    fn tick_interval(&self) -> Duration {
        LOAD_SAMPLE_INTERVAL
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        self.history.push(ctx.sampler.load_average().one);
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        match self.history.latest() {
            Some(latest) => {
                frame.text(2, 0, &format!("1m Load Avg {:.2}", latest), Font::Small, true);
                let scale = self.history.scale();
                for (x, value) in self.history.iter().enumerate() {
                    let h = (value * scale) as i32;
                    frame.line(x as i32, HEIGHT - 1 - h, x as i32, HEIGHT - 1, true);
                }
            },
            None => frame.text(2, 0, "1m Load Avg ...", Font::Small, true),
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut h = LoadHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            h.push(v);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(h.tail(2).collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(h.tail(10).count(), 3);
        assert_eq!(h.latest(), Some(4.0));
    }

    #[test]
    fn test_scale_has_floor_of_one() {
        let mut h = LoadHistory::new(10);
        h.push(0.2);
        assert_eq!(h.scale(), 40.0);
        h.push(4.0);
        assert_eq!(h.scale(), 10.0);
    }

    #[test]
    fn test_render_bars() {
        let mut screen = LoadScreen::new();
        assert!(screen.render().lit_count() > 0, "placeholder header drawn");

        screen.push_sample(1.0);
        screen.push_sample(0.5);
        let frame = screen.render();
        // Full-scale sample reaches 40px above the bottom row
        assert!(frame.pixel(0, 63 - 40));
        assert!(!frame.pixel(0, 63 - 41));
        assert!(frame.pixel(1, 63 - 20));
        assert!(!frame.pixel(1, 63 - 21));
    }
}
