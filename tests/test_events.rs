// ABOUTME: Unit tests for event handling to ensure keyboard inputs map to correct app actions

use ckl::app::state::Dialog;
use ckl::app::{AppEvent, AppState, EventHandler};
use ckl::models::Item;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn create_key_event(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn create_ctrl_key_event(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn packing_state() -> AppState {
    AppState::new(Item::list(
        "packing",
        vec![
            Item::leaf("passport"),
            Item::list("bag", vec![Item::leaf("socks"), Item::leaf("shirts")]),
            Item::leaf("charger"),
        ],
    ))
}

fn press(state: &mut AppState, key: KeyEvent) {
    if let Some(event) = EventHandler::handle_key_event(key, state) {
        EventHandler::process_event(event, state);
    }
}

#[test]
fn test_quit_key_events() {
    let state = AppState::default();

    assert_eq!(
        EventHandler::handle_key_event(create_key_event(KeyCode::Char('q')), &state),
        Some(AppEvent::Quit)
    );
    assert_eq!(
        EventHandler::handle_key_event(create_ctrl_key_event('c'), &state),
        Some(AppEvent::Quit)
    );
}

#[test]
fn test_navigation_key_events() {
    let state = AppState::default();

    for (code, expected) in [
        (KeyCode::Down, AppEvent::CursorDown),
        (KeyCode::Char('j'), AppEvent::CursorDown),
        (KeyCode::Up, AppEvent::CursorUp),
        (KeyCode::Char('k'), AppEvent::CursorUp),
    ] {
        assert_eq!(EventHandler::handle_key_event(create_key_event(code), &state), Some(expected));
    }
}

#[test]
fn test_control_key_paging() {
    let state = AppState::default();

    assert_eq!(EventHandler::handle_key_event(create_ctrl_key_event('f'), &state), Some(AppEvent::PageDown));
    assert_eq!(EventHandler::handle_key_event(create_ctrl_key_event('b'), &state), Some(AppEvent::PageUp));
    assert_eq!(EventHandler::handle_key_event(create_ctrl_key_event('a'), &state), Some(AppEvent::GoToTop));
    assert_eq!(EventHandler::handle_key_event(create_ctrl_key_event('z'), &state), Some(AppEvent::GoToBottom));
}

#[test]
fn test_plain_z_is_undo_not_go_to_end() {
    let state = AppState::default();
    assert_eq!(
        EventHandler::handle_key_event(create_key_event(KeyCode::Char('z')), &state),
        Some(AppEvent::Undo)
    );
}

#[test]
fn test_reset_needs_capital_r() {
    let state = AppState::default();
    assert_eq!(
        EventHandler::handle_key_event(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT), &state),
        Some(AppEvent::RequestReset)
    );
    assert_eq!(EventHandler::handle_key_event(create_key_event(KeyCode::Char('r')), &state), None);
}

#[test]
fn test_unknown_key_returns_none() {
    let state = AppState::default();

    assert!(EventHandler::handle_key_event(create_key_event(KeyCode::Char('x')), &state).is_none());
    assert!(EventHandler::handle_key_event(create_key_event(KeyCode::F(1)), &state).is_none());
}

#[test]
fn test_dialog_swallows_checklist_keys() {
    let mut state = AppState::default();
    state.dialog = Some(Dialog::Help);

    assert_eq!(
        EventHandler::handle_key_event(create_key_event(KeyCode::Char(' ')), &state),
        Some(AppEvent::CloseDialog)
    );
    assert!(EventHandler::handle_key_event(create_key_event(KeyCode::Char('q')), &state).is_none());
    assert!(EventHandler::handle_key_event(create_key_event(KeyCode::Down), &state).is_none());
}

#[test]
fn test_process_quit_event() {
    let mut state = AppState::default();
    assert!(!state.should_quit);

    press(&mut state, create_key_event(KeyCode::Char('q')));

    assert!(state.should_quit);
}

#[test]
fn test_help_opens_and_closes() {
    let mut state = AppState::default();

    press(&mut state, create_key_event(KeyCode::Char('?')));
    assert_eq!(state.dialog, Some(Dialog::Help));

    press(&mut state, create_key_event(KeyCode::Esc));
    assert_eq!(state.dialog, None);

    press(&mut state, create_key_event(KeyCode::Char('h')));
    assert_eq!(state.dialog, Some(Dialog::Help));
}

#[test]
fn test_space_toggles_and_z_undoes() {
    let mut state = packing_state();

    press(&mut state, create_key_event(KeyCode::Down));
    press(&mut state, create_key_event(KeyCode::Char(' ')));
    assert_eq!(state.checklist.count_checked(), (3, 5));

    press(&mut state, create_key_event(KeyCode::Char('z')));
    assert_eq!(state.checklist.count_checked(), (0, 5));
    assert_eq!(state.cursor, 1);
}

#[test]
fn test_c_shows_checked_items() {
    let mut state = packing_state();
    press(&mut state, create_key_event(KeyCode::Char(' ')));
    assert_eq!(state.displayed_items().len(), 4);

    press(&mut state, create_key_event(KeyCode::Char('c')));
    assert_eq!(state.displayed_items().len(), 5);
}

#[test]
fn test_reset_dialog_flow() {
    let mut state = packing_state();
    press(&mut state, create_key_event(KeyCode::Char(' ')));

    press(&mut state, create_key_event(KeyCode::Char('R')));
    assert_eq!(state.dialog, Some(Dialog::ConfirmReset { yes_selected: false }));

    // Esc keeps everything
    press(&mut state, create_key_event(KeyCode::Esc));
    assert_eq!(state.checklist.count_checked(), (1, 5));

    press(&mut state, create_key_event(KeyCode::Char('R')));
    press(&mut state, create_key_event(KeyCode::Right));
    press(&mut state, create_key_event(KeyCode::Enter));
    assert_eq!(state.checklist.count_checked(), (0, 5));
    assert!(state.undo_stack.is_empty());
    assert_eq!(state.dialog, None);
}

#[test]
fn test_completing_checklist_opens_dialog() {
    let mut state = packing_state();
    for _ in 0..3 {
        press(&mut state, create_key_event(KeyCode::Char(' ')));
    }
    assert_eq!(state.dialog, Some(Dialog::Completed));

    press(&mut state, create_key_event(KeyCode::Enter));
    assert_eq!(state.dialog, None);
}
