// ABOUTME: Main layout component: checklist pane, status bar and dialog overlays

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};

use super::{ChecklistViewComponent, DialogComponent, HelpComponent};
use crate::app::{state::Dialog, AppState};

pub struct LayoutComponent {
    checklist_view: ChecklistViewComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            checklist_view: ChecklistViewComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Checklist
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        self.checklist_view.render(frame, main_chunks[0], state);
        Self::render_status_bar(frame, main_chunks[1], state);

        match &state.dialog {
            Some(Dialog::Help) => HelpComponent::render(frame, frame.size()),
            Some(dialog) => DialogComponent::render(frame, frame.size(), dialog),
            None => {}
        }
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let (text, style) = match &state.notification {
            Some(n) if n.is_error() => (
                n.message.clone(),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            Some(n) => (n.message.clone(), Style::default().add_modifier(Modifier::REVERSED)),
            None => (state.status_text(), Style::default().add_modifier(Modifier::REVERSED)),
        };

        // Pad so the reversed style spans the full width
        let padded = format!("{:<width$}", text, width = area.width as usize);
        frame.render_widget(Paragraph::new(padded).style(style), area);
    }

    /// Rows available to the checklist pane for a terminal of `height` rows.
    pub fn page_size(height: u16) -> usize {
        usize::from(height.saturating_sub(1).max(1))
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
