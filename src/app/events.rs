// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::{state::Dialog, AppState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ShowHelp,
    CursorDown,
    CursorUp,
    PageDown,
    PageUp,
    GoToTop,
    GoToBottom,
    ToggleItem,
    ToggleShowCompleted,
    Undo,
    RequestReset,
    // Dialog events
    CloseDialog,
    ConfirmationToggle,  // Switch between Yes/No
    ConfirmationConfirm, // Confirm action
    ConfirmationCancel,  // Cancel dialog
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key_event.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        // Dialogs swallow everything else
        match state.dialog {
            Some(Dialog::ConfirmReset { .. }) => {
                return match key_event.code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Tab => Some(AppEvent::ConfirmationToggle),
                    KeyCode::Enter => Some(AppEvent::ConfirmationConfirm),
                    KeyCode::Esc => Some(AppEvent::ConfirmationCancel),
                    _ => None,
                };
            }
            Some(_) => {
                return match key_event.code {
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(AppEvent::CloseDialog),
                    _ => None,
                };
            }
            None => {}
        }

        if ctrl {
            return match key_event.code {
                KeyCode::Char('f') => Some(AppEvent::PageDown),
                KeyCode::Char('b') => Some(AppEvent::PageUp),
                KeyCode::Char('a') => Some(AppEvent::GoToTop),
                KeyCode::Char('z') => Some(AppEvent::GoToBottom),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Char('?' | 'h') => Some(AppEvent::ShowHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::CursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::CursorUp),
            KeyCode::PageDown => Some(AppEvent::PageDown),
            KeyCode::PageUp => Some(AppEvent::PageUp),
            KeyCode::Char(' ') => Some(AppEvent::ToggleItem),
            KeyCode::Char('c') => Some(AppEvent::ToggleShowCompleted),
            KeyCode::Char('z') => Some(AppEvent::Undo),
            KeyCode::Char('R') => Some(AppEvent::RequestReset),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ShowHelp => state.show_help(),
            AppEvent::CursorDown => state.cursor_down(),
            AppEvent::CursorUp => state.cursor_up(),
            AppEvent::PageDown => state.page_down(),
            AppEvent::PageUp => state.page_up(),
            AppEvent::GoToTop => state.go_to_top(),
            AppEvent::GoToBottom => state.go_to_bottom(),
            AppEvent::ToggleItem => state.toggle_current(),
            AppEvent::ToggleShowCompleted => state.toggle_show_completed(),
            AppEvent::Undo => state.undo(),
            AppEvent::RequestReset => state.request_reset(),
            AppEvent::CloseDialog | AppEvent::ConfirmationCancel => state.close_dialog(),
            AppEvent::ConfirmationToggle => state.toggle_confirmation(),
            AppEvent::ConfirmationConfirm => state.confirm_dialog(),
        }
    }
}
