//! The scrolling main menu.

use crate::config::Config;
use crate::display::{Font, Frame, HEIGHT, WIDTH};

pub const VISIBLE_LINES: usize = 7;
const LINE_HEIGHT: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Clock,
    Uptime,
    LoadAverage,
    DiskSpace,
    SmartStatus,
    Animation,
    GameOfLife,
    SpaceInvaders,
    /// Restart a systemd unit; `label` is what the menu shows.
    RestartService { unit: String, label: String },
    PowerOff,
    Reboot,
}

/// Menu name for a systemd unit: `smbd` is Samba, anything else is capitalised.
pub fn service_label(unit: &str) -> String {
    match unit {
        "smbd" => "Samba".to_string(),
        _ => {
            let mut chars = unit.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        },
    }
}

impl MenuItem {
    pub fn label(&self) -> String {
        match self {
            MenuItem::Clock => "Show Clock".to_string(),
            MenuItem::Uptime => "Show Uptime".to_string(),
            MenuItem::LoadAverage => "Load Average".to_string(),
            MenuItem::DiskSpace => "Disk Space".to_string(),
            MenuItem::SmartStatus => "SMART Status".to_string(),
            MenuItem::Animation => "Animation".to_string(),
            MenuItem::GameOfLife => "Game of Life".to_string(),
            MenuItem::SpaceInvaders => "Space Invaders".to_string(),
            MenuItem::RestartService { label, .. } => format!("Restart {}", label),
            MenuItem::PowerOff => "PowerOff".to_string(),
            MenuItem::Reboot => "Reboot".to_string(),
        }
    }
}

/// Screens first, then one restart entry per configured service, then power control.
pub fn menu_items(config: &Config) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::Clock,
        MenuItem::Uptime,
        MenuItem::LoadAverage,
        MenuItem::DiskSpace,
        MenuItem::SmartStatus,
        MenuItem::Animation,
        MenuItem::GameOfLife,
        MenuItem::SpaceInvaders,
    ];
    items.extend(config.services.iter().map(|unit| MenuItem::RestartService {
        unit: unit.clone(),
        label: service_label(unit),
    }));
    items.push(MenuItem::PowerOff);
    items.push(MenuItem::Reboot);
    items
}

#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,
    selected: usize,
    /// First visible item.
    offset: usize,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            selected: 0,
            offset: 0,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    /// Moves the selection by `delta`, wrapping at both ends, and scrolls it into view.
    pub fn rotate(&mut self, delta: i32) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as i64;
        self.selected = (self.selected as i64 + i64::from(delta)).rem_euclid(len) as usize;
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + VISIBLE_LINES {
            self.offset = self.selected + 1 - VISIBLE_LINES;
        }
    }

    pub fn render(&self) -> Frame {
        let mut frame = Frame::new();
        let visible = self.items.iter().enumerate().skip(self.offset).take(VISIBLE_LINES);
        let count = visible.len() as i32;
        let top = ((HEIGHT - count * LINE_HEIGHT) / 2).max(0);

        for (row, (index, item)) in visible.enumerate() {
            let y = top + row as i32 * LINE_HEIGHT;
            if index == self.selected {
                frame.fill_rect(0, y, WIDTH - 1, y + LINE_HEIGHT, true);
                frame.text(2, y, &item.label(), Font::Small, false);
            } else {
                frame.text(2, y, &item.label(), Font::Small, true);
            }
        }
        frame
    }
}
