// Add-sport dialog: a centered modal listing the available sports.
//
// Rendered on top of the main layout while `DialogState::AddSport` is open.
// Shows a selector over the available list and an in-flight footer once a
// sport has been dispatched.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::sport::Sport;

const DIALOG_WIDTH: u16 = 34;

/// Render the add dialog centered on the screen.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    available: &[Sport],
    selected: usize,
    in_flight: bool,
) {
    // Rows for each sport plus borders and the footer line.
    let height = (available.len() as u16).saturating_add(4);
    let dialog_area = centered_rect(DIALOG_WIDTH, height, area);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Add a sport ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines: Vec<Line> = available
        .iter()
        .enumerate()
        .map(|(i, &sport)| entry_line(sport, i == selected))
        .collect();

    lines.push(Line::raw(""));
    lines.push(footer_line(in_flight));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

fn entry_line(sport: Sport, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let marker = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(
            format!("{} {}", sport.icon(), sport.display_name()),
            style,
        ),
    ])
}

fn footer_line(in_flight: bool) -> Line<'static> {
    if in_flight {
        Line::from(Span::styled(
            " Adding...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(":Add  "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(":Cancel"),
        ])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
