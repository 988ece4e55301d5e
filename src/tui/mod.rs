// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the orchestrator's snapshot plus
// purely local interaction state (card selection, open dialogs, toasts, quit
// confirmation). The orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::{SportsSnapshot, Toast, UiUpdate, UserCommand};
use crate::sport::Sport;

use layout::build_layout;

// ---------------------------------------------------------------------------
// DialogState
// ---------------------------------------------------------------------------

/// Which modal dialog is open, if any. At most one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    None,
    /// The add-sport picker. `dispatched` is set once the user confirms a
    /// sport; the dialog auto-closes when that sport leaves the available
    /// list in a later snapshot.
    AddSport {
        selected: usize,
        dispatched: Option<Sport>,
    },
    /// The remove confirmation for one subscribed sport. `dispatched` is set
    /// once the user confirms; the dialog auto-closes when the sport leaves
    /// the subscribed list.
    ConfirmDelete { sport: Sport, dispatched: bool },
}

// ---------------------------------------------------------------------------
// ActiveToast
// ---------------------------------------------------------------------------

/// A toast currently on screen, with its expiry time.
#[derive(Debug, Clone)]
pub struct ActiveToast {
    pub toast: Toast,
    pub expires_at: Instant,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// The snapshot is replaced wholesale on every `UiUpdate::Snapshot`; the
/// remaining fields are local interaction state the orchestrator never sees.
pub struct ViewState {
    /// Latest snapshot from the orchestrator.
    pub snapshot: SportsSnapshot,
    /// Index of the selected card in `snapshot.subscribed`.
    pub selected: usize,
    /// Open modal dialog, if any.
    pub dialog: DialogState,
    /// Toasts currently on screen, oldest first.
    pub toasts: Vec<ActiveToast>,
    /// How long a toast stays on screen.
    pub toast_ttl: Duration,
    /// Whether the quit confirmation overlay is active.
    pub confirm_quit: bool,
}

impl ViewState {
    pub fn new(toast_ttl: Duration) -> Self {
        ViewState {
            snapshot: SportsSnapshot {
                loading: true,
                ..SportsSnapshot::default()
            },
            selected: 0,
            dialog: DialogState::None,
            toasts: Vec::new(),
            toast_ttl,
            confirm_quit: false,
        }
    }

    /// The sport under the card selection cursor, if any.
    pub fn selected_sport(&self) -> Option<Sport> {
        self.snapshot.subscribed.get(self.selected).copied()
    }

    /// Drop toasts whose time is up.
    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
///
/// Snapshots replace the rendered data and then reconcile local interaction
/// state against it: the selection is clamped to the new subscribed list, and
/// a dialog whose dispatched sport has moved lists is closed.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate, now: Instant) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.snapshot = *snapshot;

            // Clamp the card selection to the new list.
            if state.selected >= state.snapshot.subscribed.len() {
                state.selected = state.snapshot.subscribed.len().saturating_sub(1);
            }

            match &mut state.dialog {
                DialogState::AddSport {
                    selected,
                    dispatched,
                } => {
                    let available = &state.snapshot.available;
                    let done = matches!(dispatched, Some(s) if !available.contains(s));
                    if done || available.is_empty() {
                        debug!("closing add dialog after snapshot");
                        state.dialog = DialogState::None;
                    } else {
                        // Request settled but the sport is still available:
                        // the add failed, so re-enable the confirm control.
                        if dispatched.is_some() && !state.snapshot.add_in_flight {
                            *dispatched = None;
                        }
                        if *selected >= available.len() {
                            *selected = available.len() - 1;
                        }
                    }
                }
                DialogState::ConfirmDelete { sport, dispatched } => {
                    // Closes both after a confirmed removal lands and when
                    // the sport vanished for any other reason.
                    if !state.snapshot.subscribed.contains(sport) {
                        debug!("closing delete dialog after snapshot");
                        state.dialog = DialogState::None;
                    } else if *dispatched && !state.snapshot.delete_in_flight {
                        // Still subscribed with nothing in flight: the
                        // delete failed, re-enable the confirm control.
                        *dispatched = false;
                    }
                }
                DialogState::None => {}
            }
        }
        UiUpdate::Toast(toast) => {
            state.toasts.push(ActiveToast {
                toast,
                expires_at: now + state.toast_ttl,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame: the three zones, then any overlay.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::sport_cards::render(frame, layout.cards, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    match &state.dialog {
        DialogState::AddSport { selected, .. } => {
            widgets::add_dialog::render(
                frame,
                frame.area(),
                &state.snapshot.available,
                *selected,
                state.snapshot.add_in_flight,
            );
        }
        DialogState::ConfirmDelete { sport, dispatched } => {
            widgets::confirm_delete::render(
                frame,
                frame.area(),
                *sport,
                *dispatched && state.snapshot.delete_in_flight,
            );
        }
        DialogState::None => {}
    }

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }

    // Toasts render last so they sit on top of everything.
    widgets::toast::render(frame, frame.area(), &state.toasts);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    toast_ttl: Duration,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal on panic before the default hook prints.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(toast_ttl);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Updates from the orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update, Instant::now());
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                view_state.prune_toasts(Instant::now());
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
