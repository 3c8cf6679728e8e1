//! Keybinding definitions for the console.
//!
//! Normal mode maps keys to [`Action`]s. While a text field has focus the
//! keys map to [`TextAction`]s instead, and a confirmation prompt only
//! understands yes or no.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NewItem,
    EditItem,
    DeleteItem,
    OpenGrid,
    CycleCourse,
    CycleRoom,
    ClearCell,
    OpenHelp,
    OpenSearch,
    ChangePassword,
    Logout,
    Refresh,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    Insert(char),
    Backspace,
    ClearField,
    NextField,
    PrevField,
    CycleNext,
    CyclePrev,
    Submit,
    Cancel,
    Quit,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('v') => Some(Action::OpenGrid),
        KeyCode::Char('c') => Some(Action::CycleCourse),
        KeyCode::Char('r') => Some(Action::CycleRoom),
        KeyCode::Char('x') => Some(Action::ClearCell),
        KeyCode::Char('p') => Some(Action::ChangePassword),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let idx = match c {
                '1' => 0,
                '2' => 1,
                '3' => 2,
                '4' => 3,
                '5' => 4,
                '6' => 5,
                '7' => 6,
                '8' => 7,
                '9' => 8,
                '0' => 9,
                _ => return None,
            };
            Some(Action::SwitchView(idx))
        }
        _ => None,
    }
}

pub fn map_text_key(event: KeyEvent) -> Option<TextAction> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(TextAction::Quit),
            KeyCode::Char('u') => Some(TextAction::ClearField),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(c) => Some(TextAction::Insert(c)),
        KeyCode::Backspace => Some(TextAction::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(TextAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(TextAction::PrevField),
        KeyCode::Right => Some(TextAction::CycleNext),
        KeyCode::Left => Some(TextAction::CyclePrev),
        KeyCode::Enter => Some(TextAction::Submit),
        KeyCode::Esc => Some(TextAction::Cancel),
        _ => None,
    }
}

/// `Some(true)` to confirm, `Some(false)` to back out.
pub fn map_confirm_key(event: KeyEvent) -> Option<bool> {
    match event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(false),
        _ => None,
    }
}
