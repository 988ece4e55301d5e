// Sport cards panel: the user's subscribed sports, one card line each.
//
// Also renders the loading, load-failed, and empty states that replace the
// card list before data is available.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::sport::Sport;
use crate::tui::{DialogState, ViewState};

/// Render the cards panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title(" My Sports ");

    let snapshot = &state.snapshot;

    let paragraph = if snapshot.loading {
        Paragraph::new(Line::from(Span::styled(
            "Loading your sports...",
            Style::default().fg(Color::DarkGray),
        )))
    } else if snapshot.load_failed {
        Paragraph::new(Line::from(Span::styled(
            "Couldn't load your sports. Press r to retry.",
            Style::default().fg(Color::Red),
        )))
    } else if snapshot.subscribed.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "No sports yet. Press a to add one.",
            Style::default().fg(Color::DarkGray),
        )))
    } else {
        let removing = match state.dialog {
            DialogState::ConfirmDelete {
                sport,
                dispatched: true,
            } if snapshot.delete_in_flight => Some(sport),
            _ => None,
        };
        let lines: Vec<Line> = snapshot
            .subscribed
            .iter()
            .enumerate()
            .map(|(i, &sport)| card_line(sport, i == state.selected, removing == Some(sport)))
            .collect();
        Paragraph::new(lines)
    };

    frame.render_widget(paragraph.block(block), area);
}

/// Build one card line: icon, display name, selection highlight, and a
/// removal marker while that sport's delete request is in flight.
pub fn card_line(sport: Sport, selected: bool, removing: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let marker = if selected { "> " } else { "  " };
    let mut spans = vec![
        Span::raw(marker),
        Span::styled(
            format!("{} {}", sport.icon(), sport.display_name()),
            style,
        ),
    ];
    if removing {
        spans.push(Span::styled(
            "  removing...",
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
