//! Full-screen views reachable from the menu: information pages, toys and actions.
//!
//! Each screen is a state object. The controller calls `update` on the screen's own
//! schedule, forwards knob and rotation input, and presents `render`'s frame.
//! Dropping a screen stops it, including any background work it started.

mod action;
mod animation;
mod clock;
mod disk_space;
mod invaders;
mod life;
mod load;
mod smart;
mod uptime;

pub use action::*;
pub use animation::*;
pub use clock::*;
pub use disk_space::*;
pub use invaders::*;
pub use life::*;
pub use load::*;
pub use smart::*;
pub use uptime::*;

use crate::display::Frame;
use crate::input::InputEvent;
use crate::system::SystemSampler;
use chrono::{Local, NaiveDateTime};
use std::time::{Duration, Instant};

/// A point in time as seen by screens: monotonic for scheduling, wall clock for display.
#[derive(Debug, Clone, Copy)]
pub struct Moment {
    pub now: Instant,
    pub local: NaiveDateTime,
}

impl Moment {
    pub fn current() -> Self {
        Self {
            now: Instant::now(),
            local: Local::now().naive_local(),
        }
    }
}

/// What a screen gets access to while updating.
pub struct ScreenContext<'a> {
    pub moment: Moment,
    pub sampler: &'a mut SystemSampler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The screen is finished; return to the menu.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    /// Not used by this screen. An ignored knob press acts like confirm and closes it.
    Ignored,
}

pub trait Screen: Send {
    fn title(&self) -> &'static str;

    /// Delay until the next `update`.
    fn tick_interval(&self) -> Duration;

    /// Rotation and knob presses. Confirm and back never reach the screen.
    fn handle_input(&mut self, _event: InputEvent, _now: Instant) -> InputOutcome {
        InputOutcome::Ignored
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow;

    fn render(&self) -> Frame;
}
