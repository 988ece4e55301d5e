// Toast overlay: transient notifications stacked above the help bar.
//
// Each toast is one line, right-aligned near the bottom of the screen, green
// for success and red for errors. Expiry is handled by the render loop via
// `ViewState::prune_toasts`; this widget just draws whatever is left.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::protocol::ToastKind;
use crate::tui::ActiveToast;

/// Render the toast stack. The most recent toast sits lowest, just above the
/// help bar; older toasts stack upward.
pub fn render(frame: &mut Frame, area: Rect, toasts: &[ActiveToast]) {
    for (i, active) in toasts.iter().rev().enumerate() {
        // Row above the help bar, counting up.
        let offset = 2 + i as u16;
        if offset >= area.height {
            break;
        }
        let y = area.height - 1 - offset;

        let line = toast_line(active);
        // Display width, not byte length: the two differ for any non-ASCII
        // message. One trailing column of padding.
        let width = (line.width() as u16 + 1).min(area.width);
        let x = area.width.saturating_sub(width + 1);
        let toast_area = Rect::new(area.x + x, area.y + y, width, 1);

        frame.render_widget(Clear, toast_area);
        let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, toast_area);
    }
}

fn toast_line(active: &ActiveToast) -> Line<'static> {
    let (symbol, color) = match active.toast.kind {
        ToastKind::Success => ("✔", Color::Green),
        ToastKind::Error => ("✘", Color::Red),
    };
    Line::from(vec![
        Span::styled(
            format!(" {symbol} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(active.toast.message.clone(), Style::default().fg(color)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
