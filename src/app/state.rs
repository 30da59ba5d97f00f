// ABOUTME: Application state for the checklist runner: cursor, filtering, undo and dialogs
// Every change to the tree is written back to the session file straight away

use crate::app::notification::Notification;
use crate::config::AppConfig;
use crate::models::{FlatItem, Item, ItemPath};
use crate::parser::Duplicate;
use crate::session::{ChecklistSession, SessionError};
use std::path::Path;
use tracing::{error, info};

const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Duplicates(Vec<Duplicate>),
    Help,
    Completed,
    ConfirmReset { yes_selected: bool },
}

/// Previous state of one toggled item. Sublists also remember every
/// descendant, since toggling them overwrote the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub path: ItemPath,
    pub checked: bool,
    pub descendants: Option<Vec<bool>>,
}

#[derive(Debug)]
pub struct AppState {
    pub checklist: Item,
    pub session: Option<ChecklistSession>,
    pub cursor: usize,
    pub show_completed: bool,
    pub undo_stack: Vec<UndoEntry>,
    pub dialog: Option<Dialog>,
    /// Rows the checklist pane can show; paging moves by this much
    pub page_size: usize,
    pub notification: Option<Notification>,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Item::list("checklist", Vec::new()))
    }
}

impl AppState {
    pub fn new(checklist: Item) -> Self {
        Self {
            checklist,
            session: None,
            cursor: 0,
            show_completed: false,
            undo_stack: Vec::new(),
            dialog: None,
            page_size: DEFAULT_PAGE_SIZE,
            notification: None,
            should_quit: false,
        }
    }

    pub fn with_session(mut self, session: ChecklistSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Rows currently on screen: everything, or only unchecked items.
    pub fn displayed_items(&self) -> Vec<FlatItem> {
        let all = self.checklist.flatten();
        if self.show_completed {
            all
        } else {
            all.into_iter().filter(|f| !f.checked).collect()
        }
    }

    pub fn item_at_cursor(&self) -> Option<FlatItem> {
        self.displayed_items().into_iter().nth(self.cursor)
    }

    /// Move to `y` when it is on screen, then keep the cursor inside the rows.
    pub fn adjust_cursor(&mut self, y: Option<usize>) {
        let len = self.displayed_items().len();
        if let Some(y) = y {
            if y < len {
                self.cursor = y;
            }
        }
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn cursor_down(&mut self) {
        self.adjust_cursor(Some(self.cursor + 1));
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.adjust_cursor(Some(self.cursor - 1));
        }
    }

    pub fn page_down(&mut self) {
        let last = self.displayed_items().len().saturating_sub(1);
        self.adjust_cursor(Some((self.cursor + self.page_size).min(last)));
    }

    pub fn page_up(&mut self) {
        self.adjust_cursor(Some(self.cursor.saturating_sub(self.page_size)));
    }

    pub fn go_to_top(&mut self) {
        self.adjust_cursor(Some(0));
    }

    pub fn go_to_bottom(&mut self) {
        let len = self.displayed_items().len();
        self.adjust_cursor(Some(len.saturating_sub(1)));
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.adjust_cursor(None);
    }

    /// Flip the item under the cursor, remembering its previous state.
    pub fn toggle_current(&mut self) {
        let Some(flat) = self.item_at_cursor() else {
            return;
        };
        let Some(item) = self.checklist.get_mut(&flat.path) else {
            return;
        };

        self.undo_stack.push(UndoEntry {
            path: flat.path.clone(),
            checked: item.checked,
            descendants: item.is_list().then(|| item.descendant_states()),
        });
        item.toggle();
        self.persist();
        self.adjust_cursor(None);

        if self.checklist.all_checked() {
            info!("Checklist {} completed", self.checklist.name);
            self.dialog = Some(Dialog::Completed);
        }
    }

    pub fn undo(&mut self) {
        let Some(entry) = self.undo_stack.pop() else {
            return;
        };
        if let Some(item) = self.checklist.get_mut(&entry.path) {
            item.set_checked(entry.checked);
            if let Some(states) = &entry.descendants {
                item.restore_descendant_states(states);
            }
        }
        self.persist();

        let row = self
            .displayed_items()
            .iter()
            .position(|f| f.path == entry.path);
        self.adjust_cursor(row);
    }

    pub fn request_reset(&mut self) {
        self.dialog = Some(Dialog::ConfirmReset { yes_selected: false });
    }

    /// Uncheck everything. Undo history is dropped with it.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.checklist.set_checked(false);
        self.persist();
        self.notification = Some(Notification::reset_done(&self.checklist.name));
    }

    pub fn show_help(&mut self) {
        self.dialog = Some(Dialog::Help);
    }

    pub fn toggle_confirmation(&mut self) {
        if let Some(Dialog::ConfirmReset { yes_selected }) = self.dialog.as_mut() {
            *yes_selected = !*yes_selected;
        }
    }

    pub fn confirm_dialog(&mut self) {
        if let Some(Dialog::ConfirmReset { yes_selected: true }) = self.dialog {
            self.reset();
        }
        self.close_dialog();
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.adjust_cursor(None);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Text for the status bar.
    pub fn status_text(&self) -> String {
        let (checked, total) = self.checklist.count_checked();
        format!(
            "{} : {}/{} done | 'q': quit | 'z': undo | '?' help | <up>/<down> moves | <space> toggles",
            self.checklist.name, checked, total
        )
    }

    pub fn expire_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }

    fn persist(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if let Err(e) = session.dump(&self.checklist) {
            error!("Failed to save session: {}", e);
            self.notification = Some(Notification::save_failed(&e));
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Open a checklist, resuming its session when one exists.
    pub fn load(checklist_path: &Path, config: &AppConfig) -> Result<Self, SessionError> {
        let session = ChecklistSession::new(checklist_path, &config.lists_root, &config.sessions_root);
        let loaded = session.load()?;

        let mut state = AppState::new(loaded.checklist).with_session(session);
        if !loaded.duplicates.is_empty() {
            state.dialog = Some(Dialog::Duplicates(loaded.duplicates));
        }
        Ok(Self::new(state))
    }

    pub fn tick(&mut self) {
        self.state.expire_notification();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn trip() -> Item {
        Item::list(
            "trip",
            vec![
                Item::leaf("passport"),
                Item::list("toiletries", vec![Item::leaf("toothbrush"), Item::leaf("floss")]),
                Item::leaf("charger"),
            ],
        )
    }

    fn displayed_names(state: &AppState) -> Vec<String> {
        state
            .displayed_items()
            .iter()
            .map(|f| state.checklist.get(&f.path).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_checked_items_are_hidden_by_default() {
        let mut state = AppState::new(trip());
        state.toggle_current();
        assert_eq!(displayed_names(&state), vec!["toiletries", "toothbrush", "floss", "charger"]);

        state.toggle_show_completed();
        assert_eq!(displayed_names(&state).len(), 5);
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut state = AppState::new(trip());
        state.cursor = 4;
        state.toggle_current();
        assert_eq!(state.cursor, 3);

        state.go_to_top();
        state.cursor_up();
        assert_eq!(state.cursor, 0);

        state.go_to_bottom();
        state.cursor_down();
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn test_toggling_sublist_hides_children() {
        let mut state = AppState::new(trip());
        state.cursor = 1;
        state.toggle_current();
        assert_eq!(displayed_names(&state), vec!["passport", "charger"]);
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_undo_restores_sublist_children() {
        let mut state = AppState::new(trip());
        state.cursor = 3; // floss
        state.toggle_current();
        state.cursor = 1; // toiletries
        state.toggle_current();
        assert!(state.checklist.get(&[1, 0]).unwrap().checked);

        state.undo();
        assert!(!state.checklist.get(&[1]).unwrap().checked);
        assert!(!state.checklist.get(&[1, 0]).unwrap().checked);
        assert!(state.checklist.get(&[1, 1]).unwrap().checked);
        assert_eq!(state.cursor, 1);

        state.undo();
        assert!(!state.checklist.get(&[1, 1]).unwrap().checked);
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut state = AppState::new(trip());
        state.undo();
        assert_eq!(state.checklist, trip());
    }

    #[test]
    fn test_checking_last_item_shows_completed() {
        let mut state = AppState::new(Item::list("one", vec![Item::leaf("only")]));
        state.toggle_current();
        assert_eq!(state.dialog, Some(Dialog::Completed));
        assert!(displayed_names(&state).is_empty());
        assert_eq!(state.cursor, 0);

        state.close_dialog();
        assert_eq!(state.dialog, None);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut state = AppState::new(trip());
        state.toggle_current();
        state.request_reset();
        state.confirm_dialog();
        assert!(state.checklist.get(&[0]).unwrap().checked, "'No' is the default answer");

        state.request_reset();
        state.toggle_confirmation();
        state.confirm_dialog();
        assert_eq!(state.checklist.count_checked(), (0, 5));
        assert!(state.undo_stack.is_empty());
        assert_eq!(state.dialog, None);
    }

    #[test]
    fn test_paging_moves_by_page_size() {
        let items = (0..50).map(|i| Item::leaf(&format!("item {i}"))).collect();
        let mut state = AppState::new(Item::list("long", items));
        state.page_size = 10;

        state.page_down();
        assert_eq!(state.cursor, 10);
        state.go_to_bottom();
        state.page_down();
        assert_eq!(state.cursor, 49);
        state.page_up();
        assert_eq!(state.cursor, 39);
        state.cursor = 3;
        state.page_up();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_status_text_counts_progress() {
        let mut state = AppState::new(trip());
        state.cursor = 1;
        state.toggle_current();
        assert!(state.status_text().starts_with("trip : 3/5 done | 'q': quit"));
    }

    #[test]
    fn test_toggle_is_written_to_session() {
        let dir = TempDir::new().unwrap();
        let lists = dir.path().join("lists");
        std::fs::create_dir_all(&lists).unwrap();
        let list_path = lists.join("daily.ckl");
        std::fs::write(&list_path, "coffee\ncoffee\nstretch\n").unwrap();

        let config = AppConfig {
            lists_root: lists.clone(),
            sessions_root: dir.path().join("sessions"),
            ..AppConfig::default()
        };

        let mut app = App::load(&list_path, &config).unwrap();
        assert!(matches!(app.state.dialog, Some(Dialog::Duplicates(ref d)) if d[0].name == "coffee"));
        app.state.close_dialog();
        app.state.toggle_current();

        let reopened = App::load(&list_path, &config).unwrap();
        assert_eq!(reopened.state.dialog, None);
        assert!(reopened.state.checklist.get(&[0]).unwrap().checked);
    }
}
