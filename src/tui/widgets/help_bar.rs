// Help bar widget: keyboard shortcut hints for the current mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{DialogState, ViewState};

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Pick the hint line for the active mode. Hints for keys that are currently
/// no-ops (`a` with nothing left to add, `d` with no cards) are omitted, so
/// the bar only advertises actions the handler will accept.
pub fn hint_text(state: &ViewState) -> String {
    if state.confirm_quit {
        return " y:Quit | n:Cancel".to_string();
    }
    match state.dialog {
        DialogState::AddSport { .. } => " Up/Down:Select | Enter:Add | Esc:Cancel".to_string(),
        DialogState::ConfirmDelete { .. } => " y:Remove | n:Cancel".to_string(),
        DialogState::None => {
            let mut hints = Vec::new();
            if !state.snapshot.available.is_empty() {
                hints.push("a:Add");
            }
            if !state.snapshot.subscribed.is_empty() {
                hints.push("d:Remove");
                hints.push("Up/Down:Select");
            }
            hints.push("r:Refresh");
            hints.push("q:Quit");
            format!(" {}", hints.join(" | "))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
