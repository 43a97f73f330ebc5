use crate::data::settings::Settings;
use crate::install::{InstallError, InstallOption, Transition};
use crate::ui::theme::Theme;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Installer,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct InstallerState {
    pub selected: InstallOption,
    /// A request is in flight; further actions are ignored.
    pub busy: bool,
    /// The last request failed, so the button offers a retry.
    pub failed: bool,
    pub status: String,
    pub tone: StatusTone,
}

impl Default for InstallerState {
    fn default() -> Self {
        // desktop is pre-selected
        let selected = InstallOption::Desktop;
        Self {
            selected,
            busy: false,
            failed: false,
            status: format!("Selected: {}", selected.as_label()),
            tone: StatusTone::Info,
        }
    }
}

impl InstallerState {
    pub fn button_label(&self) -> &'static str {
        if self.busy {
            "Working..."
        } else if self.failed {
            "Retry"
        } else {
            "Continue"
        }
    }
}

pub struct AppState {
    pub view: View,
    pub installer: InstallerState,
    pub settings: Settings,
    pub theme: Theme,
    pub pending_transition: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(view: View, settings: Settings, theme: Theme) -> Self {
        Self {
            view,
            installer: InstallerState::default(),
            settings,
            theme,
            pending_transition: None,
            should_quit: false,
        }
    }

    pub fn select(&mut self, option: InstallOption) {
        if self.installer.busy {
            return;
        }
        self.installer.selected = option;
        self.set_status(format!("Selected: {}", option.as_label()), StatusTone::Info);
    }

    pub fn move_selection(&mut self, delta: isize) {
        let all = InstallOption::ALL;
        let cur = all
            .iter()
            .position(|o| *o == self.installer.selected)
            .unwrap_or(0) as isize;
        let next = (cur + delta).clamp(0, all.len() as isize - 1) as usize;
        self.select(all[next]);
    }

    /// Marks the installer busy. Returns `false` if a request is already
    /// running or the view has moved on.
    pub fn begin_request(&mut self, status: impl Into<String>) -> bool {
        if self.installer.busy || self.view != View::Installer || self.pending_transition.is_some() {
            return false;
        }
        self.installer.busy = true;
        self.set_status(status, StatusTone::Info);
        true
    }

    pub fn finish_request(&mut self, result: Result<(String, Transition), InstallError>, now: Instant) {
        self.installer.busy = false;
        match result {
            Ok((message, transition)) => {
                self.installer.failed = false;
                self.set_status(message, StatusTone::Success);
                self.pending_transition = Some(now + transition.after);
            }
            Err(e) => {
                self.installer.failed = true;
                self.set_status(format!("Failed: {e}"), StatusTone::Error);
            }
        }
    }

    /// Switches to the player once a scheduled transition is due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(due) = self.pending_transition {
            if now >= due {
                self.pending_transition = None;
                self.view = View::Player;
                log::info!("Showing main player screen");
            }
        }
    }

    fn set_status(&mut self, msg: impl Into<String>, tone: StatusTone) {
        self.installer.status = msg.into();
        self.installer.tone = tone;
    }
}
