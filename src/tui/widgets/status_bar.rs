// Status bar widget: subscription count and in-flight request indicators.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [count] [in-flight indicators]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " sportsub ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(count_label(state), Style::default().fg(Color::White)),
    ];

    if state.snapshot.add_in_flight {
        spans.push(Span::styled(
            "  adding...",
            Style::default().fg(Color::Yellow),
        ));
    }
    if state.snapshot.delete_in_flight {
        spans.push(Span::styled(
            "  removing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Build the subscription count label.
pub fn count_label(state: &ViewState) -> String {
    if state.snapshot.loading {
        "loading".to_string()
    } else if state.snapshot.load_failed {
        "load failed".to_string()
    } else {
        format!(
            "{}/{} sports",
            state.snapshot.subscribed.len(),
            state.snapshot.catalog.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
