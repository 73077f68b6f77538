//! SMART health page, refreshed by a background task while the screen is open.

use super::{Flow, Screen, ScreenContext};
use crate::display::Frame;
use crate::error::AppError;
use crate::models::SmartReport;
use crate::system::smart::read_report;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const SMART_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub enum SmartState {
    Loading,
    Report(SmartReport),
    Error(String),
}

impl SmartState {
    pub fn lines(&self) -> Vec<String> {
        match self {
            SmartState::Loading => vec!["SMART Status:".to_string(), "Reading...".to_string()],
            SmartState::Report(report) => report.display_lines(),
            SmartState::Error(msg) if msg == "smartctl not found" => vec![msg.clone()],
            SmartState::Error(msg) => vec!["SMART Read Error".to_string(), msg.clone()],
        }
    }
}

pub struct SmartScreen {
    state: watch::Receiver<SmartState>,
    task: Option<JoinHandle<()>>,
}

impl SmartScreen {
    /// Starts polling `smartctl` for `device`. Must be called inside a tokio runtime.
    pub fn spawn(device: String, use_sudo: bool) -> Self {
        let (tx, rx) = watch::channel(SmartState::Loading);
        let task = tokio::spawn(async move {
            loop {
                let state = match read_report(&device, use_sudo).await {
                    Ok(report) => SmartState::Report(report),
                    Err(AppError::Command(msg)) => SmartState::Error(msg),
                    Err(e) => SmartState::Error(e.to_string()),
                };
                if tx.send(state).is_err() {
                    return;
                }
                tokio::time::sleep(SMART_REFRESH).await;
            }
        });
        Self {
            state: rx,
            task: Some(task),
        }
    }

    #[cfg(test)]
    /// A screen showing a fixed state, without a polling task.
    pub fn with_state(state: SmartState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self {
            state: rx,
            task: None,
        }
    }
}

impl Drop for SmartScreen {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Stopping SMART polling");
            task.abort();
        }
    }
}

impl Screen for SmartScreen {
    fn title(&self) -> &'static str {
        "SMART Status"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(250)
    }

    fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Flow {
        Flow::Continue
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::new();
        frame.text_lines(&self.state.borrow().lines(), false);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SmartHealth;

    #[test]
    fn test_state_lines() {
        assert_eq!(
            SmartState::Error("smartctl not found".to_string()).lines(),
            vec!["smartctl not found"]
        );
        assert_eq!(
            SmartState::Error("smartctl exit status: 2".to_string()).lines(),
            vec!["SMART Read Error", "smartctl exit status: 2"]
        );
        let failed = SmartReport {
            health: SmartHealth::Failed,
            ..SmartReport::default()
        };
        assert_eq!(
            SmartState::Report(failed).lines(),
            vec!["SMART Status: FAILED", "Drive may be failing!"]
        );
    }

    #[test]
    fn test_fixed_state_renders() {
        let screen = SmartScreen::with_state(SmartState::Loading);
        assert!(screen.render().lit_count() > 0);
    }

    #[tokio::test]
    async fn test_dropping_screen_aborts_polling() {
        let mut screen = SmartScreen::spawn("/dev/nonexistent".to_string(), false);
        let handle = screen
            .task
            .as_ref()
            .map(|t| t.abort_handle())
            .expect("polling task");
        // Let the first read finish; the task then sleeps until the next refresh
        tokio::time::timeout(Duration::from_secs(5), screen.state.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(!handle.is_finished());

        drop(screen);
        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(handle.is_finished());
    }
}
