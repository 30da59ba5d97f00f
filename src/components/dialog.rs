// ABOUTME: Modal dialogs: duplicate-item warning, completion notice and reset confirmation

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::state::Dialog;
use crate::parser::Duplicate;

pub struct DialogComponent;

impl DialogComponent {
    /// Render any dialog except help, which has its own component.
    pub fn render(frame: &mut Frame, area: Rect, dialog: &Dialog) {
        match dialog {
            Dialog::Duplicates(duplicates) => {
                let mut body = duplicate_lines(duplicates);
                body.push(Line::from(""));
                body.push(buttons(&[("OK", true)]));
                Self::render_box(frame, centered_rect(80, 60, area), "Warning: Duplicate Items", body, Color::Yellow);
            }
            Dialog::Completed => {
                let body = vec![
                    Line::from(""),
                    Line::from("Fine Work").alignment(Alignment::Center),
                    Line::from(""),
                    buttons(&[("Indeed", true)]),
                ];
                Self::render_box(frame, fixed_rect(40, 7, area), "Checklist Completed", body, Color::Green);
            }
            Dialog::ConfirmReset { yes_selected } => {
                let body = vec![
                    Line::from(""),
                    Line::from("This will erase all undo history.").alignment(Alignment::Center),
                    Line::from(""),
                    buttons(&[("No", !yes_selected), ("Yes", *yes_selected)]),
                ];
                Self::render_box(frame, fixed_rect(44, 7, area), "Uncheck All?", body, Color::Red);
            }
            Dialog::Help => {}
        }
    }

    fn render_box(frame: &mut Frame, area: Rect, title: &str, body: Vec<Line>, color: Color) {
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(body)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// One line per occurrence, with a blank line between names.
pub fn duplicate_lines(duplicates: &[Duplicate]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for dup in duplicates {
        for loc in &dup.locations {
            lines.push(Line::from(format!(
                "{}: from {} line {}",
                dup.name,
                loc.file.display(),
                loc.line
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn buttons(labels: &[(&str, bool)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (label, selected)) in labels.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        let style = if *selected {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("< {label} >"), style));
    }
    Line::from(spans).alignment(Alignment::Center)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` box centred in `r`, shrunk to fit.
fn fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
