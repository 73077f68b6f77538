//! The panel event loop: input, deadlines and Ctrl-C multiplexed on one task.

use super::controller::{Controller, ScreenFactory};
use crate::display::{FramePlan, Panel};
use crate::error::Result;
use crate::input::{InputEvent, InputReceiver};
use crate::screens::Moment;
use tracing::{debug, info};

/// Shows every frame of `plan`, holding each for its delay.
///
/// Input arriving meanwhile stays queued in the channel.
pub async fn play(panel: &mut dyn Panel, plan: FramePlan) -> Result<()> {
    for (frame, delay) in plan {
        panel.show(&frame)?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(())
}

/// Runs until Ctrl-C, a quit key or the input source going away, then blanks the panel.
pub async fn run_event_loop<F: ScreenFactory>(
    panel: &mut dyn Panel,
    controller: &mut Controller<F>,
    mut input: InputReceiver,
) -> Result<()> {
    play(panel, controller.start()).await?;

    loop {
        let deadline = tokio::time::Instant::from_std(controller.next_deadline());
        tokio::select! {
            event = input.recv() => match event {
                Some(InputEvent::Quit) => {
                    info!("Quit requested");
                    break;
                },
                Some(event) => {
                    debug!("Input {:?} in {}", event, controller.view_name());
                    let plan = controller.handle_input(event, Moment::current());
                    play(panel, plan).await?;
                },
                None => {
                    info!("Input source closed");
                    break;
                },
            },
            _ = tokio::time::sleep_until(deadline) => {
                let plan = controller.tick(Moment::current());
                play(panel, plan).await?;
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down panel");
                break;
            },
        }
    }

    panel.clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controller::Timing;
    use crate::app::dashboard::SystemView;
    use crate::app::menu::{Menu, MenuItem};
    use crate::display::Frame;
    use crate::input::input_channel;
    use crate::models::WeatherReport;
    use crate::screens::{ClockScreen, Screen};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use tokio::sync::watch;

    #[derive(Clone, Default)]
    struct RecordingPanel {
        shown: Arc<Mutex<Vec<Frame>>>,
        cleared: Arc<Mutex<bool>>,
    }

    impl Panel for RecordingPanel {
        fn show(&mut self, frame: &Frame) -> Result<()> {
            self.shown.lock().unwrap().push(frame.clone());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            *self.cleared.lock().unwrap() = true;
            Ok(())
        }
    }

    struct Clocks;

    impl ScreenFactory for Clocks {
        fn create(&self, _item: &MenuItem) -> Box<dyn Screen> {
            Box::new(ClockScreen::new())
        }
    }

    #[tokio::test]
    async fn test_loop_shows_menu_and_stops_on_quit() {
        let (_weather_tx, weather) = watch::channel(WeatherReport::default());
        let menu = Menu::new(vec![MenuItem::Clock, MenuItem::Uptime]);
        let mut controller = Controller::new(
            menu.clone(),
            Clocks,
            Timing {
                idle_timeout: Duration::from_secs(3600),
                dashboard_cycle: Duration::from_secs(15),
            },
            SystemView::new("lo", "sda"),
            weather,
            Instant::now(),
        );
        let mut panel = RecordingPanel::default();
        let (tx, rx) = input_channel();
        tx.send(InputEvent::Rotate(1)).unwrap();
        tx.send(InputEvent::Quit).unwrap();

        run_event_loop(&mut panel, &mut controller, rx).await.unwrap();

        let shown = panel.shown.lock().unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], menu.render());
        assert_eq!(controller.menu().selected(), 1);
        assert!(*panel.cleared.lock().unwrap());
    }

    #[tokio::test]
    async fn test_closed_input_ends_loop() {
        let (_weather_tx, weather) = watch::channel(WeatherReport::default());
        let mut controller = Controller::new(
            Menu::new(vec![MenuItem::Clock]),
            Clocks,
            Timing {
                idle_timeout: Duration::from_secs(3600),
                dashboard_cycle: Duration::from_secs(15),
            },
            SystemView::new("lo", "sda"),
            weather,
            Instant::now(),
        );
        let mut panel = RecordingPanel::default();
        let (tx, rx) = input_channel();
        drop(tx);
        run_event_loop(&mut panel, &mut controller, rx).await.unwrap();
        assert_eq!(panel.shown.lock().unwrap().len(), 1);
    }
}
