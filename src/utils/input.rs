use crate::app::state::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OptionUp,
    OptionDown,
    SelectOption(usize),
    Confirm,
    Skip,
    None,
}

pub fn map_key(ev: KeyEvent, view: View) -> Action {
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('C') = ev.code {
            return Action::Quit;
        }
    }

    match view {
        View::Installer => match ev.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => Action::OptionUp,
            KeyCode::Down | KeyCode::Char('j') => Action::OptionDown,
            KeyCode::Char(c @ '1'..='3') => Action::SelectOption(c as usize - '1' as usize),
            KeyCode::Enter => Action::Confirm,
            KeyCode::Char('s') | KeyCode::Char('S') => Action::Skip,
            _ => Action::None,
        },
        View::Player => match ev.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        },
    }
}
