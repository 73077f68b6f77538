//! Decides what the panel shows: the menu, an open screen or the idle dashboard.
//!
//! The controller is synchronous and owns all UI state. The runtime feeds it input
//! events and deadline ticks and presents the frame plans it returns.

use super::dashboard::{render_weather, SystemView};
use super::menu::{Menu, MenuItem};
use crate::config::Config;
use crate::display::transition::{
    dissolve, slide, DISSOLVE_DURATION, DISSOLVE_STEPS, SLIDE_DELAY, SLIDE_STEP,
};
use crate::display::{Frame, FramePlan};
use crate::input::InputEvent;
use crate::models::WeatherReport;
use crate::screens::{
    ActionScreen, AnimationScreen, ClockScreen, DiskSpaceScreen, Flow, GameOfLifeScreen,
    InputOutcome, InvadersScreen, LoadScreen, Moment, Screen, ScreenContext, SmartScreen,
    UptimeScreen,
};
use crate::system::{SystemAction, SystemSampler};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info};

/// How often the visible dashboard view is redrawn.
pub const DASHBOARD_REDRAW: Duration = Duration::from_millis(500);

/// Builds the screen behind a menu entry.
pub trait ScreenFactory: Send {
    fn create(&self, item: &MenuItem) -> Box<dyn Screen>;
}

/// The real screens, wired to the configured devices and commands.
pub struct PanelScreens {
    smart_device: String,
    use_sudo: bool,
    dry_run: bool,
}

impl PanelScreens {
    pub fn from_config(config: &Config) -> Self {
        Self {
            smart_device: config.smart_device.clone(),
            use_sudo: config.use_sudo,
            dry_run: config.dry_run,
        }
    }
}

impl ScreenFactory for PanelScreens {
    fn create(&self, item: &MenuItem) -> Box<dyn Screen> {
        match item {
            MenuItem::Clock => Box::new(ClockScreen::new()),
            MenuItem::Uptime => Box::new(UptimeScreen::new()),
            MenuItem::LoadAverage => Box::new(LoadScreen::new()),
            MenuItem::DiskSpace => Box::new(DiskSpaceScreen::new()),
            MenuItem::SmartStatus => {
                Box::new(SmartScreen::spawn(self.smart_device.clone(), self.use_sudo))
            },
            MenuItem::Animation => Box::new(AnimationScreen::new()),
            MenuItem::GameOfLife => Box::new(GameOfLifeScreen::new()),
            MenuItem::SpaceInvaders => Box::new(InvadersScreen::new()),
            MenuItem::RestartService { unit, .. } => Box::new(ActionScreen::spawn(
                SystemAction::RestartService(unit.clone()),
                self.use_sudo,
                self.dry_run,
            )),
            MenuItem::PowerOff => Box::new(ActionScreen::spawn(
                SystemAction::PowerOff,
                self.use_sudo,
                self.dry_run,
            )),
            MenuItem::Reboot => Box::new(ActionScreen::spawn(
                SystemAction::Reboot,
                self.use_sudo,
                self.dry_run,
            )),
        }
    }
}

enum View {
    Menu,
    Screen {
        screen: Box<dyn Screen>,
        next_update: Instant,
    },
    Dashboard {
        showing_weather: bool,
        cycle_start: Instant,
        next_redraw: Instant,
    },
}

/// Timing knobs, split out of `Config` so tests can shorten them.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub idle_timeout: Duration,
    pub dashboard_cycle: Duration,
}

impl From<&Config> for Timing {
    fn from(config: &Config) -> Self {
        Self {
            idle_timeout: config.idle_timeout,
            dashboard_cycle: config.dashboard_cycle,
        }
    }
}

pub struct Controller<F: ScreenFactory> {
    menu: Menu,
    factory: F,
    view: View,
    timing: Timing,
    sampler: SystemSampler,
    system_view: SystemView,
    weather: watch::Receiver<WeatherReport>,
    last_activity: Instant,
    /// The last frame handed to the panel, the starting point of transitions.
    shown: Frame,
}

fn single(frame: Frame) -> FramePlan {
    vec![(frame, Duration::ZERO)]
}

impl<F: ScreenFactory> Controller<F> {
    pub fn new(
        menu: Menu,
        factory: F,
        timing: Timing,
        system_view: SystemView,
        weather: watch::Receiver<WeatherReport>,
        now: Instant,
    ) -> Self {
        Self {
            menu,
            factory,
            view: View::Menu,
            timing,
            sampler: SystemSampler::new(),
            system_view,
            weather,
            last_activity: now,
            shown: Frame::new(),
        }
    }

    /// Name of the current view, for logs and tests.
    pub fn view_name(&self) -> &'static str {
        match &self.view {
            View::Menu => "menu",
            View::Screen { screen, .. } => screen.title(),
            View::Dashboard {
                showing_weather: true,
                ..
            } => "weather",
            View::Dashboard { .. } => "system",
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The first frame: the menu.
    pub fn start(&mut self) -> FramePlan {
        self.present(single(self.menu.render()))
    }

    /// When `tick` next has something to do.
    pub fn next_deadline(&self) -> Instant {
        match &self.view {
            View::Menu => self.last_activity + self.timing.idle_timeout,
            View::Screen { next_update, .. } => *next_update,
            View::Dashboard { next_redraw, .. } => *next_redraw,
        }
    }

    pub fn tick(&mut self, moment: Moment) -> FramePlan {
        let now = moment.now;
        let plan = match &mut self.view {
            View::Menu => {
                if now.saturating_duration_since(self.last_activity) < self.timing.idle_timeout {
                    return Vec::new();
                }
                info!("Idle for {:?}, showing dashboard", self.timing.idle_timeout);
                let system = self.draw_system(moment);
                let plan = slide(&self.menu.render(), &system, SLIDE_STEP, SLIDE_DELAY);
                self.view = View::Dashboard {
                    showing_weather: false,
                    cycle_start: now,
                    next_redraw: now + DASHBOARD_REDRAW,
                };
                plan
            },
            View::Screen {
                screen,
                next_update,
            } => {
                if now < *next_update {
                    return Vec::new();
                }
                let mut ctx = ScreenContext {
                    moment,
                    sampler: &mut self.sampler,
                };
                match screen.update(&mut ctx) {
                    Flow::Continue => {
                        *next_update = now + screen.tick_interval();
                        single(screen.render())
                    },
                    Flow::Exit => {
                        debug!("{} finished", screen.title());
                        self.close_screen(now)
                    },
                }
            },
            View::Dashboard {
                showing_weather,
                cycle_start,
                next_redraw,
            } => {
                if now < *next_redraw {
                    return Vec::new();
                }
                *next_redraw = now + DASHBOARD_REDRAW;
                let cycle_over =
                    now.saturating_duration_since(*cycle_start) > self.timing.dashboard_cycle;
                let weather = *showing_weather;
                if cycle_over {
                    *showing_weather = !weather;
                    *cycle_start = now;
                }
                self.draw_dashboard(weather, cycle_over, moment)
            },
        };
        self.present(plan)
    }

    pub fn handle_input(&mut self, event: InputEvent, moment: Moment) -> FramePlan {
        let now = moment.now;
        self.last_activity = now;

        let plan = match &mut self.view {
            View::Dashboard { .. } => {
                debug!("Input {:?} wakes the menu", event);
                let plan = dissolve(
                    &self.shown,
                    &self.menu.render(),
                    DISSOLVE_STEPS,
                    DISSOLVE_DURATION,
                );
                self.view = View::Menu;
                plan
            },
            View::Menu => match event {
                InputEvent::Rotate(delta) => {
                    self.menu.rotate(delta);
                    single(self.menu.render())
                },
                InputEvent::Confirm | InputEvent::Knob => self.open_selected(moment),
                InputEvent::Back | InputEvent::Quit => single(self.menu.render()),
            },
            View::Screen { screen, .. } => match event {
                InputEvent::Back | InputEvent::Confirm | InputEvent::Quit => self.close_screen(now),
                InputEvent::Rotate(_) | InputEvent::Knob => {
                    match screen.handle_input(event, now) {
                        InputOutcome::Handled => single(screen.render()),
                        InputOutcome::Ignored if event == InputEvent::Knob => {
                            self.close_screen(now)
                        },
                        InputOutcome::Ignored => Vec::new(),
                    }
                },
            },
        };
        self.present(plan)
    }

    fn open_selected(&mut self, moment: Moment) -> FramePlan {
        let Some(item) = self.menu.selected_item() else {
            return Vec::new();
        };
        info!("Opening {}", item.label());
        let mut screen = self.factory.create(item);
        let mut ctx = ScreenContext {
            moment,
            sampler: &mut self.sampler,
        };
        if screen.update(&mut ctx) == Flow::Exit {
            return single(self.menu.render());
        }
        let frame = screen.render();
        self.view = View::Screen {
            next_update: moment.now + screen.tick_interval(),
            screen,
        };
        single(frame)
    }

    /// Drops the open screen (stopping its background work) and shows the menu.
    fn close_screen(&mut self, now: Instant) -> FramePlan {
        self.view = View::Menu;
        self.last_activity = now;
        single(self.menu.render())
    }

    fn draw_system(&mut self, moment: Moment) -> Frame {
        let mut ctx = ScreenContext {
            moment,
            sampler: &mut self.sampler,
        };
        self.system_view.draw(&mut ctx)
    }

    fn draw_weather(&self) -> Frame {
        render_weather(&self.weather.borrow())
    }

    /// Redraws the view that was showing, or slides to the other one at the end of a cycle.
    fn draw_dashboard(&mut self, was_weather: bool, switch: bool, moment: Moment) -> FramePlan {
        let system = self.draw_system(moment);
        let weather = self.draw_weather();
        let (current, other) = if was_weather {
            (weather, system)
        } else {
            (system, weather)
        };
        if switch {
            debug!("Dashboard switching to {}", self.view_name());
            slide(&current, &other, SLIDE_STEP, SLIDE_DELAY)
        } else {
            single(current)
        }
    }

    fn present(&mut self, plan: FramePlan) -> FramePlan {
        if let Some((frame, _)) = plan.last() {
            self.shown = frame.clone();
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::menu::menu_items;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts updates, exits after `lifetime` of them and consumes rotation only.
    struct ProbeScreen {
        updates: Arc<AtomicUsize>,
        lifetime: usize,
    }

    impl Screen for ProbeScreen {
        fn title(&self) -> &'static str {
            "probe"
        }

        fn tick_interval(&self) -> Duration {
            Duration::from_millis(100)
        }

        fn handle_input(&mut self, event: InputEvent, _now: Instant) -> InputOutcome {
            match event {
                InputEvent::Rotate(_) => InputOutcome::Handled,
                _ => InputOutcome::Ignored,
            }
        }

        fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Flow {
            let n = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.lifetime {
                Flow::Exit
            } else {
                Flow::Continue
            }
        }

        fn render(&self) -> Frame {
            let mut frame = Frame::new();
            frame.set_pixel(64, 32, true);
            frame
        }
    }

    struct ProbeFactory {
        updates: Arc<AtomicUsize>,
        lifetime: usize,
    }

    impl ScreenFactory for ProbeFactory {
        fn create(&self, _item: &MenuItem) -> Box<dyn Screen> {
            Box::new(ProbeScreen {
                updates: Arc::clone(&self.updates),
                lifetime: self.lifetime,
            })
        }
    }

    const IDLE: Duration = Duration::from_secs(30);
    const CYCLE: Duration = Duration::from_secs(15);

    fn controller(lifetime: usize, t0: Instant) -> (Controller<ProbeFactory>, Arc<AtomicUsize>) {
        let updates = Arc::new(AtomicUsize::new(0));
        let factory = ProbeFactory {
            updates: Arc::clone(&updates),
            lifetime,
        };
        let (_tx, weather) = watch::channel(WeatherReport::default());
        let mut c = Controller::new(
            Menu::new(menu_items(&Config::default())),
            factory,
            Timing {
                idle_timeout: IDLE,
                dashboard_cycle: CYCLE,
            },
            SystemView::new("lo", "sda"),
            weather,
            t0,
        );
        c.start();
        (c, updates)
    }

    fn at(t0: Instant, ms: u64) -> Moment {
        Moment {
            now: t0 + Duration::from_millis(ms),
            ..Moment::current()
        }
    }

    #[test]
    fn test_idle_slides_to_dashboard() {
        let t0 = Instant::now();
        let (mut c, _) = controller(100, t0);
        assert_eq!(c.next_deadline(), t0 + IDLE);
        assert!(c.tick(at(t0, 29_000)).is_empty());
        assert_eq!(c.view_name(), "menu");

        let plan = c.tick(at(t0, 30_000));
        assert_eq!(plan.len(), 17, "slide from menu to system view");
        assert_eq!(c.view_name(), "system");
        assert_eq!(c.next_deadline(), t0 + IDLE + DASHBOARD_REDRAW);
    }

    #[test]
    fn test_dashboard_cycles_between_views() {
        let t0 = Instant::now();
        let (mut c, _) = controller(100, t0);
        c.tick(at(t0, 30_000));

        assert_eq!(c.tick(at(t0, 30_500)).len(), 1, "plain redraw");
        assert_eq!(c.view_name(), "system");

        let plan = c.tick(at(t0, 45_500));
        assert_eq!(plan.len(), 17);
        assert_eq!(c.view_name(), "weather");

        assert_eq!(c.tick(at(t0, 46_000)).len(), 1);
        assert_eq!(c.view_name(), "weather");
    }

    #[test]
    fn test_any_input_wakes_menu_with_dissolve() {
        let t0 = Instant::now();
        let (mut c, _) = controller(100, t0);
        c.tick(at(t0, 30_000));

        let plan = c.handle_input(InputEvent::Rotate(1), at(t0, 31_000));
        assert_eq!(plan.len(), DISSOLVE_STEPS as usize);
        assert_eq!(plan.last().map(|p| &p.0), Some(&c.menu().render()));
        assert_eq!(c.view_name(), "menu");
        assert_eq!(c.menu().selected(), 0, "waking input is consumed");
        assert_eq!(c.next_deadline(), t0 + Duration::from_millis(31_000) + IDLE);
    }

    #[test]
    fn test_menu_rotation_and_enter_screen() {
        let t0 = Instant::now();
        let (mut c, updates) = controller(100, t0);
        c.handle_input(InputEvent::Rotate(2), at(t0, 10));
        assert_eq!(c.menu().selected(), 2);

        let plan = c.handle_input(InputEvent::Confirm, at(t0, 20));
        assert_eq!(plan.len(), 1);
        assert!(plan[0].0.pixel(64, 32));
        assert_eq!(c.view_name(), "probe");
        assert_eq!(updates.load(Ordering::SeqCst), 1, "first update runs on entry");
        assert_eq!(c.next_deadline(), t0 + Duration::from_millis(120));

        // No idle switch while a screen is open
        assert_eq!(c.tick(at(t0, 60_000)).len(), 1);
        assert_eq!(c.view_name(), "probe");

        // Rotation goes to the screen, not the menu
        c.handle_input(InputEvent::Rotate(1), at(t0, 60_010));
        assert_eq!(c.menu().selected(), 2);
    }

    #[test]
    fn test_back_closes_screen() {
        let t0 = Instant::now();
        let (mut c, _) = controller(100, t0);
        c.handle_input(InputEvent::Confirm, at(t0, 0));
        let plan = c.handle_input(InputEvent::Back, at(t0, 500));
        assert_eq!(plan[0].0, c.menu().render());
        assert_eq!(c.view_name(), "menu");
        assert_eq!(c.next_deadline(), t0 + Duration::from_millis(500) + IDLE);
    }

    #[test]
    fn test_unhandled_knob_acts_as_confirm() {
        let t0 = Instant::now();
        let (mut c, _) = controller(100, t0);
        c.handle_input(InputEvent::Knob, at(t0, 0));
        assert_eq!(c.view_name(), "probe");
        c.handle_input(InputEvent::Knob, at(t0, 50));
        assert_eq!(c.view_name(), "menu");
    }

    #[tokio::test]
    async fn test_panel_screens_map_menu_items() {
        let factory = PanelScreens::from_config(&Config {
            dry_run: true,
            ..Config::default()
        });
        assert_eq!(factory.create(&MenuItem::Clock).title(), "Show Clock");
        assert_eq!(factory.create(&MenuItem::GameOfLife).title(), "Game of Life");
        let restart = MenuItem::RestartService {
            unit: "smbd".to_string(),
            label: "Samba".to_string(),
        };
        assert_eq!(factory.create(&restart).title(), "Restart Service");
    }

    #[test]
    fn test_screen_can_finish_itself() {
        let t0 = Instant::now();
        let (mut c, updates) = controller(2, t0);
        c.handle_input(InputEvent::Confirm, at(t0, 0));
        assert!(c.tick(at(t0, 50)).is_empty(), "not due yet");
        let plan = c.tick(at(t0, 100));
        assert_eq!(updates.load(Ordering::SeqCst), 2);
        assert_eq!(plan[0].0, c.menu().render());
        assert_eq!(c.view_name(), "menu");
    }
}
