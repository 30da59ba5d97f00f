// ABOUTME: Checklist pane rendering numbered rows with check boxes, indentation and a scrollbar

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::app::AppState;

pub const ALL_DONE: &str = "[🥇]";

#[derive(Default)]
pub struct ChecklistViewComponent {
    list_state: ListState,
}

impl ChecklistViewComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Self::build_rows(state);

        if rows.is_empty() {
            frame.render_widget(Paragraph::new(ALL_DONE), area);
            self.list_state.select(None);
            return;
        }

        let row_count = rows.len();
        let number_width = row_count.to_string().len();
        let items: Vec<ListItem> = rows
            .into_iter()
            .enumerate()
            .map(|(idx, (text, is_list))| {
                let text_style = if is_list {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>width$} ", idx + 1, width = number_width),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(text, text_style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        self.list_state.select(Some(state.cursor.min(row_count - 1)));
        frame.render_stateful_widget(list, area, &mut self.list_state);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(row_count).position(state.cursor);
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }

    /// Row text and whether the row is a sublist, for every displayed item.
    pub fn build_rows(state: &AppState) -> Vec<(String, bool)> {
        state
            .displayed_items()
            .into_iter()
            .filter_map(|flat| {
                let item = state.checklist.get(&flat.path)?;
                let mark = if item.checked { 'x' } else { ' ' };
                Some((
                    format!("[{}] {}{}", mark, "  ".repeat(flat.level), item.name),
                    flat.is_list,
                ))
            })
            .collect()
    }
}
