//! A small Space Invaders clone played with the encoder and knob.

use super::{Flow, InputOutcome, Screen, ScreenContext};
use crate::display::{Font, Frame, HEIGHT, WIDTH};
use crate::input::InputEvent;
use std::time::{Duration, Instant};
use tracing::info;

const FRAME_DELAY: Duration = Duration::from_millis(30);
const GAME_OVER_HOLD: Duration = Duration::from_millis(1500);

const PLAYER_Y: i32 = HEIGHT - 8;
const PLAYER_WIDTH: i32 = 6;
const PLAYER_SPEED: i32 = 3;
/// Larger jumps in one frame are encoder noise.
const MAX_STEP_DELTA: i32 = 3;

const BULLET_SPEED: i32 = 2;
const FIRE_COOLDOWN: Duration = Duration::from_millis(100);
/// Rotation right after a shot is usually the knob wobbling.
const FIRE_BLOCK: Duration = Duration::from_millis(100);

const ALIEN_COLS: i32 = 8;
const START_ROWS: i32 = 3;
const MAX_ROWS: i32 = 5;
const ALIEN_SPACING_X: i32 = 12;
const ALIEN_SPACING_Y: i32 = 8;
const ALIEN_MAX_X: i32 = WIDTH - 8;
const ALIEN_DROP: i32 = 4;
const DROP_INTERVAL: Duration = Duration::from_millis(120);
const HIT_RANGE: i32 = 4;
const HIT_SCORE: u32 = 10;

fn spawn_wave(rows: i32) -> Vec<(i32, i32)> {
    (0..rows)
        .flat_map(|r| (0..ALIEN_COLS).map(move |c| (10 + c * ALIEN_SPACING_X, 8 + r * ALIEN_SPACING_Y)))
        .collect()
}

fn elapsed_since(last: Option<Instant>, now: Instant) -> Option<Duration> {
    last.map(|t| now.saturating_duration_since(t))
}

/// Game state, advanced one frame at a time.
#[derive(Debug, Clone)]
pub struct InvadersGame {
    player_x: i32,
    pending_steps: i32,
    bullets: Vec<(i32, i32)>,
    aliens: Vec<(i32, i32)>,
    alien_rows: i32,
    direction: i32,
    score: u32,
    last_fire: Option<Instant>,
    last_drop: Option<Instant>,
    over: bool,
}

impl Default for InvadersGame {
    fn default() -> Self {
        Self::new()
    }
}

impl InvadersGame {
    pub fn new() -> Self {
        Self {
            player_x: WIDTH / 2,
            pending_steps: 0,
            bullets: Vec::new(),
            aliens: spawn_wave(START_ROWS),
            alien_rows: START_ROWS,
            direction: 1,
            score: 0,
            last_fire: None,
            last_drop: None,
            over: false,
        }
    }

    pub fn player_x(&self) -> i32 {
        self.player_x
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn aliens(&self) -> &[(i32, i32)] {
        &self.aliens
    }

    pub fn bullets(&self) -> &[(i32, i32)] {
        &self.bullets
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Queues encoder steps for the next frame, unless a shot was just fired.
    pub fn rotate(&mut self, delta: i32, now: Instant) {
        if elapsed_since(self.last_fire, now).is_some_and(|d| d <= FIRE_BLOCK) {
            return;
        }
        self.pending_steps += delta;
    }

    /// Fires from the cannon if the cooldown has passed. Returns whether a bullet spawned.
    pub fn fire(&mut self, now: Instant) -> bool {
        if elapsed_since(self.last_fire, now).is_some_and(|d| d < FIRE_COOLDOWN) {
            return false;
        }
        self.bullets.push((self.player_x + 2, PLAYER_Y - 3));
        self.last_fire = Some(now);
        true
    }

    /// Advances one frame.
    pub fn step(&mut self, now: Instant) {
        if self.over {
            return;
        }

        let steps = std::mem::take(&mut self.pending_steps);
        if steps.abs() <= MAX_STEP_DELTA {
            self.player_x = (self.player_x + steps * PLAYER_SPEED).clamp(0, WIDTH - PLAYER_WIDTH);
        }

        self.move_aliens(now);

        self.bullets = self
            .bullets
            .iter()
            .map(|&(bx, by)| (bx, by - BULLET_SPEED))
            .filter(|&(_, by)| by > 0)
            .collect();

        self.resolve_hits();

        if self.aliens.is_empty() {
            self.alien_rows = (self.alien_rows + 1).min(MAX_ROWS);
            self.aliens = spawn_wave(self.alien_rows);
            self.direction = 1;
        }

        if self.aliens.iter().any(|&(_, ay)| ay >= PLAYER_Y - 2) {
            info!(score = self.score, "Invaders reached the cannon");
            self.over = true;
        }
    }

    fn move_aliens(&mut self, now: Instant) {
        if self.aliens.is_empty() {
            return;
        }
        let dir = self.direction;
        let out_of_bounds = self
            .aliens
            .iter()
            .any(|&(ax, _)| !(0..=ALIEN_MAX_X).contains(&(ax + dir)));
        let can_drop = elapsed_since(self.last_drop, now).map_or(true, |d| d >= DROP_INTERVAL);

        if out_of_bounds && can_drop {
            self.last_drop = Some(now);
            self.direction = -dir;
            for alien in &mut self.aliens {
                alien.1 += ALIEN_DROP;
            }
        } else {
            for alien in &mut self.aliens {
                alien.0 = (alien.0 + dir).clamp(0, ALIEN_MAX_X);
            }
        }
    }

    fn resolve_hits(&mut self) {
        let mut i = 0;
        while i < self.bullets.len() {
            let (bx, by) = self.bullets[i];
            let hit = self
                .aliens
                .iter()
                .position(|&(ax, ay)| (bx - ax).abs() < HIT_RANGE && (by - ay).abs() < HIT_RANGE);
            match hit {
                Some(idx) => {
                    self.bullets.remove(i);
                    self.aliens.remove(idx);
                    self.score += HIT_SCORE;
                },
                None => i += 1,
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if self.over {
            frame.text(30, 24, "GAME OVER", Font::Small, true);
            frame.text(35, 40, &format!("Score {}", self.score), Font::Small, true);
            return;
        }
        frame.text(2, 0, &format!("SCORE {}", self.score), Font::Small, true);
        for &(ax, ay) in &self.aliens {
            frame.fill_rect(ax, ay, ax + 3, ay + 2, true);
        }
        let px = self.player_x;
        frame.fill_rect(px, PLAYER_Y, px + PLAYER_WIDTH - 1, PLAYER_Y + 2, true);
        for &(bx, by) in &self.bullets {
            frame.fill_rect(bx, by, bx + 1, by + 2, true);
        }
    }
}

pub struct InvadersScreen {
    game: InvadersGame,
}

impl Default for InvadersScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl InvadersScreen {
    pub fn new() -> Self {
        Self {
            game: InvadersGame::new(),
        }
    }
}

impl Screen for InvadersScreen {
    fn title(&self) -> &'static str {
        "Space Invaders"
    }

    fn tick_interval(&self) -> Duration {
        if self.game.is_over() {
            GAME_OVER_HOLD
        } else {
            FRAME_DELAY
        }
    }

    fn handle_input(&mut self, event: InputEvent, now: Instant) -> InputOutcome {
        match event {
            InputEvent::Rotate(delta) => self.game.rotate(delta, now),
            InputEvent::Knob => {
                self.game.fire(now);
            },
            _ => return InputOutcome::Ignored,
        }
        InputOutcome::Handled
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        // The game over card has been shown for one full hold interval
        if self.game.is_over() {
            return Flow::Exit;
        }
        self.game.step(ctx.moment.now);
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        self.game.draw(&mut frame);
        frame
    }
}
