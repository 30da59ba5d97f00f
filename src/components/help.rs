// ABOUTME: Help overlay component displaying keyboard shortcuts and commands

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

use super::dialog::centered_rect;

pub struct HelpComponent;

impl HelpComponent {
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Navigation:").style(heading),
            ListItem::new("  <UP>/k      Move cursor up"),
            ListItem::new("  <DOWN>/j    Move cursor down"),
            ListItem::new("  <CTRL>-F    Page down"),
            ListItem::new("  <CTRL>-B    Page up"),
            ListItem::new("  <CTRL>-Z    Go to end"),
            ListItem::new("  <CTRL>-A    Go to beginning"),
            ListItem::new(""),
            ListItem::new("Checklist:").style(heading),
            ListItem::new("  <SPACE>     Check/uncheck item"),
            ListItem::new("  c           Show/hide checked items"),
            ListItem::new("  z           Undo"),
            ListItem::new("  R           Reset checklist"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  ?/h         Show this help"),
            ListItem::new("  q           Quit"),
            ListItem::new("  <CTRL>-C    Force quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press Enter or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }
}
