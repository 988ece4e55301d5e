// Remove confirmation overlay: a centered modal naming the sport.
//
// The warning covers the server-side cascade: removing a sport also removes
// the user's subscriptions to organizations in that sport.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use crate::sport::Sport;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 7;

/// Render the remove confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, sport: Sport, in_flight: bool) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            format!(" Remove {}? ", sport.display_name()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![
        Line::raw(format!(
            " This also removes your {} organization subscriptions.",
            sport.display_name()
        )),
        Line::raw(""),
    ];

    if in_flight {
        lines.push(Line::from(Span::styled(
            " Removing...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::raw(" Remove? ("),
            Span::styled(
                "y",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("/"),
            Span::styled(
                "n",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(")"),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
