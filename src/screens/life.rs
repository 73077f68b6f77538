//! Conway's Game of Life on a wrapping 64x32 grid of 2px cells.

use super::{Flow, InputOutcome, Screen, ScreenContext};
use crate::display::{Frame, HEIGHT, WIDTH};
use crate::input::InputEvent;
use rand::Rng;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

const CELL_SIZE: i32 = 2;
pub const LIFE_COLS: usize = (WIDTH / CELL_SIZE) as usize;
pub const LIFE_ROWS: usize = (HEIGHT / CELL_SIZE) as usize;

/// Alpha steps per fade direction; 11 frames from 1.0 down to 0.0 (and back).
const FADE_STEPS: u8 = 10;
const FADE_FRAME: Duration = Duration::from_millis(30);
const MIN_GENERATION_MS: u64 = 80;
const MAX_GENERATION_MS: u64 = 140;

/// A toroidal grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl LifeGrid {
    pub fn empty(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// Each cell alive with probability one half.
    pub fn random<R: Rng>(cols: usize, rows: usize, rng: &mut R) -> Self {
        Self {
            cols,
            rows,
            cells: (0..cols * rows).map(|_| rng.gen_bool(0.5)).collect(),
        }
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.cols + x]
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        self.cells[y * self.cols + x] = alive;
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Live neighbours of `(x, y)`, wrapping at every edge.
    pub fn live_neighbours(&self, x: usize, y: usize) -> u8 {
        let mut n = 0;
        for dy in [self.rows - 1, 0, 1] {
            for dx in [self.cols - 1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx) % self.cols;
                let ny = (y + dy) % self.rows;
                if self.is_alive(nx, ny) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Next generation under B3/S23. Rows are computed in parallel.
    pub fn step(&self) -> Self {
        let cols = self.cols;
        let cells = (0..self.rows)
            .into_par_iter()
            .flat_map_iter(|y| {
                (0..cols).map(move |x| {
                    let n = self.live_neighbours(x, y);
                    matches!((self.is_alive(x, y), n), (true, 2) | (_, 3))
                })
            })
            .collect();
        Self {
            cols,
            rows: self.rows,
            cells,
        }
    }

    fn draw(&self, frame: &mut Frame, alpha: f64) {
        let mut rng = rand::thread_rng();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if !self.is_alive(x, y) || rng.gen::<f64>() >= alpha {
                    continue;
                }
                let (x0, y0) = (x as i32 * CELL_SIZE, y as i32 * CELL_SIZE);
                frame.fill_rect(x0, y0, x0 + CELL_SIZE - 1, y0 + CELL_SIZE - 1, true);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    /// Fading the old population out; the step counts up to `FADE_STEPS`.
    FadingOut(u8),
    FadingIn(u8),
}

pub struct GameOfLifeScreen {
    grid: LifeGrid,
    phase: Phase,
    regenerate: bool,
    generation_delay: Duration,
}

impl Default for GameOfLifeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl GameOfLifeScreen {
    pub fn new() -> Self {
        Self::with_grid(LifeGrid::random(LIFE_COLS, LIFE_ROWS, &mut rand::thread_rng()))
    }

    pub fn with_grid(grid: LifeGrid) -> Self {
        Self {
            grid,
            phase: Phase::Running,
            regenerate: false,
            generation_delay: Duration::from_millis(MIN_GENERATION_MS),
        }
    }

    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    #[cfg(test)]
    pub fn is_fading(&self) -> bool {
        self.phase != Phase::Running
    }

    fn alpha(&self) -> f64 {
        match self.phase {
            Phase::Running => 1.0,
            Phase::FadingOut(k) => f64::from(FADE_STEPS - k) / f64::from(FADE_STEPS),
            Phase::FadingIn(k) => f64::from(k) / f64::from(FADE_STEPS),
        }
    }
}

impl Screen for GameOfLifeScreen {
    fn title(&self) -> &'static str {
        "Game of Life"
    }

    fn tick_interval(&self) -> Duration {
        match self.phase {
            Phase::Running => self.generation_delay,
            _ => FADE_FRAME,
        }
    }

    fn handle_input(&mut self, event: InputEvent, _now: Instant) -> InputOutcome {
        match event {
            InputEvent::Knob => {
                self.regenerate = true;
                InputOutcome::Handled
            },
            _ => InputOutcome::Ignored,
        }
    }

    fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Flow {
        self.phase = match self.phase {
            Phase::Running if self.regenerate => {
                debug!("Regenerating life grid");
                self.regenerate = false;
                Phase::FadingOut(0)
            },
            Phase::Running => {
                self.grid = self.grid.step();
                let ms = rand::thread_rng().gen_range(MIN_GENERATION_MS..=MAX_GENERATION_MS);
                self.generation_delay = Duration::from_millis(ms);
                Phase::Running
            },
            Phase::FadingOut(k) if k < FADE_STEPS => Phase::FadingOut(k + 1),
            Phase::FadingOut(_) => {
                self.grid = LifeGrid::random(self.grid.cols, self.grid.rows, &mut rand::thread_rng());
                Phase::FadingIn(0)
            },
            Phase::FadingIn(k) if k < FADE_STEPS => Phase::FadingIn(k + 1),
            Phase::FadingIn(_) => {
                // Presses during the fade are dropped
                self.regenerate = false;
                Phase::Running
            },
        };
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        self.grid.draw(&mut frame, self.alpha());
        frame
    }
}
