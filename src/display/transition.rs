//! Screen-to-screen transitions, produced as frame plans the event loop plays back.

use super::frame::{Frame, WIDTH};
use std::time::Duration;

/// Frames to present in order, each held for its delay.
pub type FramePlan = Vec<(Frame, Duration)>;

pub const SLIDE_STEP: i32 = 8;
pub const SLIDE_DELAY: Duration = Duration::from_millis(10);
pub const DISSOLVE_STEPS: i32 = 10;
pub const DISSOLVE_DURATION: Duration = Duration::from_millis(500);

/// Slides `from` out to the left while `to` enters from the right.
///
/// Offsets run `0, step, .., WIDTH`, so the last frame is exactly `to`.
pub fn slide(from: &Frame, to: &Frame, step: i32, delay: Duration) -> FramePlan {
    let step = step.max(1);
    let mut plan = Vec::new();
    let mut offset = 0;
    while offset <= WIDTH {
        let mut frame = Frame::new();
        frame.paste(from, -offset, 0);
        frame.paste(to, WIDTH - offset, 0);
        plan.push((frame, delay));
        offset += step;
    }
    plan
}

/// Reveals `to` over `from` a few rows at a time: frame `k` shows the rows with
/// `y % steps < k`.
pub fn dissolve(from: &Frame, to: &Frame, steps: i32, duration: Duration) -> FramePlan {
    let steps = steps.max(1);
    let delay = (duration / steps as u32).max(Duration::from_millis(10));
    (1..=steps)
        .map(|k| {
            let mut frame = from.clone();
            frame.paste_rows(to, |y| y % steps < k);
            (frame, delay)
        })
        .collect()
}
