//! Bouncing sprite.

use super::{Flow, Screen, ScreenContext};
use crate::display::{Frame, HEIGHT, WIDTH};
use std::time::Duration;

const SPRITE_SIZE: i32 = 6;

pub struct AnimationScreen {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl Default for AnimationScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScreen {
    pub fn new() -> Self {
        Self {
            x: 10,
            y: 20,
            dx: 2,
            dy: 1,
        }
    }

    /// Moves one frame and bounces off the edges.
    pub fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
        if self.x <= 0 || self.x + SPRITE_SIZE >= WIDTH {
            self.dx = -self.dx;
        }
        if self.y <= 0 || self.y + SPRITE_SIZE >= HEIGHT {
            self.dy = -self.dy;
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl Screen for AnimationScreen {
    fn title(&self) -> &'static str {
        "Animation"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(30)
    }

    fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Flow {
        self.step();
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        let (x, y, s) = (self.x, self.y, SPRITE_SIZE);
        frame.fill_rect(x, y, x + s, y + s, true);
        frame.stroke_rect(x + 1, y + 1, x + s, y + s, false);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounces_off_right_edge() {
        let mut a = AnimationScreen::new();
        for _ in 0..200 {
            a.step();
            let (x, y) = a.position();
            assert!(x >= -2 && x + SPRITE_SIZE <= WIDTH + 2, "x out of range: {}", x);
            assert!(y >= -1 && y + SPRITE_SIZE <= HEIGHT + 1, "y out of range: {}", y);
        }
    }

    #[test]
    fn test_render_has_hollow_center() {
        let a = AnimationScreen::new();
        let frame = a.render();
        assert!(frame.pixel(10, 20), "outer corner lit");
        assert!(!frame.pixel(11, 21), "inner outline dark");
        assert!(frame.pixel(13, 23), "centre lit");
    }
}
