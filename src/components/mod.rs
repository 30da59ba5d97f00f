// ABOUTME: UI components for the TUI interface: checklist pane, help and dialogs

pub mod checklist_view;
pub mod dialog;
pub mod help;
pub mod layout;

pub use checklist_view::ChecklistViewComponent;
pub use dialog::DialogComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
