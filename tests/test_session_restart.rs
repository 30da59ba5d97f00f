// ABOUTME: Tests for resuming checklists from saved sessions and clearing them on request

use ckl::app::state::Dialog;
use ckl::app::App;
use ckl::config::AppConfig;
use ckl::session::{clear_sessions, SessionError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn test_config(root: &Path) -> AppConfig {
    AppConfig {
        lists_root: root.join("lists"),
        sessions_root: root.join("sessions"),
        log_file: root.join("ckl.log"),
        ..AppConfig::default()
    }
}

fn write_list(config: &AppConfig, relative: &str, content: &str) -> PathBuf {
    let path = config.lists_root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_progress_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let list = write_list(&config, "travel/trip.ckl", "passport\nbag\n  socks\n  shirts\ncharger\n");

    let mut app = App::load(&list, &config).unwrap();
    assert_eq!(app.state.checklist.name, "trip");
    app.state.toggle_current();
    assert_eq!(app.state.checklist.count_checked(), (1, 5));

    let session_file = config.sessions_root.join("travel/trip.ckl");
    assert!(session_file.exists(), "session should be written on every change");

    let restarted = App::load(&list, &config).unwrap();
    assert_eq!(restarted.state.checklist.count_checked(), (1, 5));
    assert!(restarted.state.checklist.get(&[0]).unwrap().checked);
    assert!(restarted.state.undo_stack.is_empty());
}

#[test]
fn test_session_wins_over_edited_list() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let list = write_list(&config, "trip.ckl", "passport\ncharger\n");

    let mut app = App::load(&list, &config).unwrap();
    app.state.toggle_current();

    // Edits to the list are ignored until the session is cleared
    fs::write(&list, "passport\ncharger\numbrella\n").unwrap();
    let resumed = App::load(&list, &config).unwrap();
    assert_eq!(resumed.state.checklist.count_checked(), (1, 2));

    let removed = clear_sessions(&config.sessions_root).unwrap();
    assert_eq!(removed, 1);
    assert!(config.sessions_root.is_dir(), "sessions directory itself is kept");

    let fresh = App::load(&list, &config).unwrap();
    assert_eq!(fresh.state.checklist.count_checked(), (0, 3));
}

#[test]
fn test_session_file_can_be_opened_directly() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let list = write_list(&config, "trip.ckl", "passport\ncharger\n");

    let mut app = App::load(&list, &config).unwrap();
    app.state.toggle_current();

    let session_file = config.sessions_root.join("trip.ckl");
    let mut reopened = App::load(&session_file, &config).unwrap();
    assert_eq!(reopened.state.checklist.count_checked(), (1, 2));

    reopened.state.toggle_current();
    let again = App::load(&list, &config).unwrap();
    assert_eq!(again.state.checklist.count_checked(), (2, 2));
}

#[test]
fn test_inherited_duplicates_open_warning() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    write_list(&config, "base.ckl", "keys\nwallet\n");
    let list = write_list(&config, "full.ckl", "from: base\nkeys\n");

    let app = App::load(&list, &config).unwrap();
    let Some(Dialog::Duplicates(duplicates)) = &app.state.dialog else {
        panic!("expected duplicate warning, got {:?}", app.state.dialog);
    };
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].name, "keys");
    assert_eq!(duplicates[0].locations.len(), 2);
}

#[test]
fn test_corrupt_session_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let list = write_list(&config, "trip.ckl", "passport\n");
    fs::create_dir_all(&config.sessions_root).unwrap();
    fs::write(config.sessions_root.join("trip.ckl"), "not json").unwrap();

    let err = App::load(&list, &config).unwrap_err();
    assert!(matches!(err, SessionError::Format { .. }));
}

#[test]
fn test_missing_checklist_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());

    let err = App::load(&config.lists_root.join("nope.ckl"), &config).unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
}
