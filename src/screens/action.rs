//! Runs a service or power action and reports how it went.

use super::{Flow, Screen, ScreenContext};
use crate::display::Frame;
use crate::error::Result;
use crate::system::services::{self, SystemAction};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{info, warn};

const DONE_HOLD: Duration = Duration::from_secs(1);
const ERROR_HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    Running,
    Done { since: Instant },
    Failed { reason: String, since: Instant },
}

pub struct ActionScreen {
    action: SystemAction,
    state: ActionState,
    result: Option<oneshot::Receiver<Result<()>>>,
}

impl ActionScreen {
    /// Starts `action` on a background task. Must be called inside a tokio runtime.
    ///
    /// The command keeps running if the screen is closed early.
    pub fn spawn(action: SystemAction, use_sudo: bool, dry_run: bool) -> Self {
        let (tx, rx) = oneshot::channel();
        let task_action = action.clone();
        tokio::spawn(async move {
            let result = services::run(&task_action, use_sudo, dry_run).await;
            let _ = tx.send(result);
        });
        Self::pending(action, rx)
    }

    fn pending(action: SystemAction, result: oneshot::Receiver<Result<()>>) -> Self {
        Self {
            action,
            state: ActionState::Running,
            result: Some(result),
        }
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    fn poll_result(&mut self, now: Instant) {
        let Some(rx) = self.result.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Err(TryRecvError::Empty) => return,
            Ok(outcome) => outcome.map_err(|e| e.to_string()),
            Err(TryRecvError::Closed) => Err("action task ended".to_string()),
        };
        self.result = None;
        self.state = match outcome {
            Ok(()) => {
                info!("{} finished", self.action);
                ActionState::Done { since: now }
            },
            Err(reason) => {
                warn!("{} failed: {}", self.action, reason);
                ActionState::Failed { reason, since: now }
            },
        };
    }

    fn lines(&self) -> Vec<String> {
        match &self.state {
            ActionState::Running => vec!["Running...".to_string(), self.action.progress_label()],
            ActionState::Done { .. } => vec!["Done".to_string()],
            ActionState::Failed { reason, .. } => vec!["Error:".to_string(), reason.clone()],
        }
    }
}

impl Screen for ActionScreen {
    fn title(&self) -> &'static str {
        match self.action {
            SystemAction::RestartService(_) => "Restart Service",
            SystemAction::PowerOff => "PowerOff",
            SystemAction::Reboot => "Reboot",
        }
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(100)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Flow {
        let now = ctx.moment.now;
        self.poll_result(now);
        let held = |since: &Instant, hold| now.saturating_duration_since(*since) >= hold;
        match &self.state {
            ActionState::Running => Flow::Continue,
            ActionState::Done { since } if held(since, DONE_HOLD) => Flow::Exit,
            ActionState::Failed { since, .. } if held(since, ERROR_HOLD) => Flow::Exit,
            _ => Flow::Continue,
        }
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        frame.text_lines(&self.lines(), false);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::screens::Moment;
    use crate::system::SystemSampler;

    fn update_at(screen: &mut ActionScreen, sampler: &mut SystemSampler, now: Instant) -> Flow {
        let mut ctx = ScreenContext {
            moment: Moment {
                now,
                ..Moment::current()
            },
            sampler,
        };
        screen.update(&mut ctx)
    }

    #[test]
    fn test_success_holds_done_for_a_second() {
        let mut sampler = SystemSampler::new();
        let (tx, rx) = oneshot::channel();
        let mut screen = ActionScreen::pending(SystemAction::Reboot, rx);
        let t0 = Instant::now();

        assert_eq!(update_at(&mut screen, &mut sampler, t0), Flow::Continue);
        assert_eq!(screen.lines(), vec!["Running...", "Rebooting"]);

        tx.send(Ok(())).ok();
        assert_eq!(update_at(&mut screen, &mut sampler, t0), Flow::Continue);
        assert_eq!(screen.state(), &ActionState::Done { since: t0 });
        assert_eq!(
            update_at(&mut screen, &mut sampler, t0 + Duration::from_millis(900)),
            Flow::Continue
        );
        assert_eq!(update_at(&mut screen, &mut sampler, t0 + DONE_HOLD), Flow::Exit);
    }

    #[test]
    fn test_failure_shows_reason_for_two_seconds() {
        let mut sampler = SystemSampler::new();
        let (tx, rx) = oneshot::channel();
        let mut screen =
            ActionScreen::pending(SystemAction::RestartService("smbd".to_string()), rx);
        let t0 = Instant::now();

        tx.send(Err(AppError::Command("Unit smbd.service not found.".to_string())))
            .ok();
        assert_eq!(update_at(&mut screen, &mut sampler, t0), Flow::Continue);
        assert_eq!(screen.lines()[0], "Error:");
        assert!(screen.lines()[1].contains("smbd.service"));
        assert_eq!(
            update_at(&mut screen, &mut sampler, t0 + DONE_HOLD),
            Flow::Continue
        );
        assert_eq!(update_at(&mut screen, &mut sampler, t0 + ERROR_HOLD), Flow::Exit);
    }

    #[test]
    fn test_dropped_sender_is_an_error() {
        let mut sampler = SystemSampler::new();
        let (tx, rx) = oneshot::channel::<Result<()>>();
        drop(tx);
        let mut screen = ActionScreen::pending(SystemAction::PowerOff, rx);
        update_at(&mut screen, &mut sampler, Instant::now());
        assert!(matches!(screen.state(), ActionState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_completes() {
        let mut sampler = SystemSampler::new();
        let mut screen = ActionScreen::spawn(SystemAction::Reboot, true, true);
        let mut done = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            update_at(&mut screen, &mut sampler, Instant::now());
            if matches!(screen.state(), ActionState::Done { .. }) {
                done = true;
                break;
            }
        }
        assert!(done);
    }
}
