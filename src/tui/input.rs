// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// orchestrator, or into local ViewState mutations (card selection, dialog
// open/close). Dialog cancellation never produces a command: an in-flight
// request runs to completion on the server regardless.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{DialogState, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator (add, delete, refresh, quit). Returns `None` when the key
/// press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match view_state.dialog {
        DialogState::AddSport { .. } => handle_add_dialog(key_event, view_state),
        DialogState::ConfirmDelete { .. } => handle_delete_dialog(key_event, view_state),
        DialogState::None => handle_normal(key_event, view_state),
    }
}

/// Normal mode: card navigation and dialog/command entry points.
fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.snapshot.subscribed.len().saturating_sub(1);
            view_state.selected = (view_state.selected + 1).min(last);
            None
        }

        // Open the add dialog. Pointless while there is nothing to add.
        KeyCode::Char('a') => {
            if !view_state.snapshot.available.is_empty() {
                view_state.dialog = DialogState::AddSport {
                    selected: 0,
                    dispatched: None,
                };
            }
            None
        }

        // Open the remove confirmation for the selected card. Blocked while
        // another remove is in flight, since only one runs at a time.
        KeyCode::Char('d') => {
            if !view_state.snapshot.delete_in_flight {
                if let Some(sport) = view_state.selected_sport() {
                    view_state.dialog = DialogState::ConfirmDelete {
                        sport,
                        dispatched: false,
                    };
                }
            }
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Refresh),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Add dialog mode: selector navigation, confirm, cancel.
fn handle_add_dialog(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let available_len = view_state.snapshot.available.len();
    let add_in_flight = view_state.snapshot.add_in_flight;

    let DialogState::AddSport {
        ref mut selected,
        ref mut dispatched,
    } = view_state.dialog
    else {
        return None;
    };

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            *selected = selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            *selected = (*selected + 1).min(available_len.saturating_sub(1));
            None
        }
        KeyCode::Enter => {
            // One add at a time; further confirms are ignored until the
            // dialog closes or the request settles.
            if add_in_flight || dispatched.is_some() {
                return None;
            }
            let sport = view_state.snapshot.available.get(*selected).copied()?;
            *dispatched = Some(sport);
            Some(UserCommand::AddSport(sport))
        }
        KeyCode::Esc => {
            view_state.dialog = DialogState::None;
            None
        }
        _ => None,
    }
}

/// Remove confirmation mode: y/Enter confirm, n/Esc cancel, rest blocked.
fn handle_delete_dialog(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let delete_in_flight = view_state.snapshot.delete_in_flight;

    let DialogState::ConfirmDelete {
        sport,
        ref mut dispatched,
    } = view_state.dialog
    else {
        return None;
    };

    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if delete_in_flight || *dispatched {
                return None;
            }
            *dispatched = true;
            Some(UserCommand::DeleteSport(sport))
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.dialog = DialogState::None;
            None
        }
        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SportsSnapshot;
    use crate::sport::{available_sports, Sport};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::time::Duration;

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Helper to create a KeyEvent with Ctrl modifier.
    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state_with(subscribed: Vec<Sport>) -> ViewState {
        let catalog = Sport::ALL.to_vec();
        let mut state = ViewState::new(Duration::from_secs(4));
        state.snapshot = SportsSnapshot {
            available: available_sports(&catalog, &subscribed),
            catalog,
            subscribed,
            ..SportsSnapshot::default()
        };
        state
    }

    // -- Card selection --

    #[test]
    fn down_moves_selection_and_clamps() {
        let mut state = state_with(vec![Sport::Baseball, Sport::Tennis]);
        assert!(handle_key(key(KeyCode::Down), &mut state).is_none());
        assert_eq!(state.selected, 1);
        assert!(handle_key(key(KeyCode::Char('j')), &mut state).is_none());
        assert_eq!(state.selected, 1, "selection should clamp at the last card");
    }

    #[test]
    fn up_moves_selection_and_does_not_underflow() {
        let mut state = state_with(vec![Sport::Baseball, Sport::Tennis]);
        state.selected = 1;
        assert!(handle_key(key(KeyCode::Char('k')), &mut state).is_none());
        assert_eq!(state.selected, 0);
        assert!(handle_key(key(KeyCode::Up), &mut state).is_none());
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn selection_on_empty_list_stays_put() {
        let mut state = state_with(vec![]);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected, 0);
    }

    // -- Add dialog --

    #[test]
    fn a_opens_add_dialog() {
        let mut state = state_with(vec![Sport::Baseball]);
        let result = handle_key(key(KeyCode::Char('a')), &mut state);
        assert!(result.is_none());
        assert_eq!(
            state.dialog,
            DialogState::AddSport {
                selected: 0,
                dispatched: None
            }
        );
    }

    #[test]
    fn a_is_noop_when_nothing_available() {
        let mut state = state_with(Sport::ALL.to_vec());
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn add_dialog_navigation_clamps() {
        // available: basketball, football, hockey, soccer, tennis
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::AddSport {
            selected: 0,
            dispatched: None,
        };

        handle_key(key(KeyCode::Up), &mut state);
        assert!(matches!(
            state.dialog,
            DialogState::AddSport { selected: 0, .. }
        ));

        for _ in 0..10 {
            handle_key(key(KeyCode::Down), &mut state);
        }
        assert!(matches!(
            state.dialog,
            DialogState::AddSport { selected: 4, .. }
        ));
    }

    #[test]
    fn add_dialog_enter_dispatches_selected_sport() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::AddSport {
            selected: 1,
            dispatched: None,
        };

        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(result, Some(UserCommand::AddSport(Sport::Football)));
        assert_eq!(
            state.dialog,
            DialogState::AddSport {
                selected: 1,
                dispatched: Some(Sport::Football)
            },
            "dialog stays open until the refetch confirms"
        );
    }

    #[test]
    fn add_dialog_enter_is_blocked_while_in_flight() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.snapshot.add_in_flight = true;
        state.dialog = DialogState::AddSport {
            selected: 0,
            dispatched: None,
        };
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    #[test]
    fn add_dialog_second_enter_is_blocked_after_dispatch() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::AddSport {
            selected: 0,
            dispatched: None,
        };
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_some());
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    #[test]
    fn add_dialog_esc_closes_without_command() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::AddSport {
            selected: 2,
            dispatched: None,
        };
        let result = handle_key(key(KeyCode::Esc), &mut state);
        assert!(result.is_none());
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn add_dialog_blocks_normal_mode_keys() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::AddSport {
            selected: 0,
            dispatched: None,
        };
        assert!(handle_key(key(KeyCode::Char('r')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(!state.confirm_quit);
    }

    // -- Remove confirmation --

    #[test]
    fn d_opens_delete_dialog_for_selected_card() {
        let mut state = state_with(vec![Sport::Baseball, Sport::Tennis]);
        state.selected = 1;
        let result = handle_key(key(KeyCode::Char('d')), &mut state);
        assert!(result.is_none());
        assert_eq!(
            state.dialog,
            DialogState::ConfirmDelete {
                sport: Sport::Tennis,
                dispatched: false
            }
        );
    }

    #[test]
    fn d_is_noop_with_no_cards() {
        let mut state = state_with(vec![]);
        handle_key(key(KeyCode::Char('d')), &mut state);
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn d_is_blocked_while_delete_in_flight() {
        let mut state = state_with(vec![Sport::Baseball, Sport::Tennis]);
        state.snapshot.delete_in_flight = true;
        handle_key(key(KeyCode::Char('d')), &mut state);
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn delete_dialog_y_dispatches() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        let result = handle_key(key(KeyCode::Char('y')), &mut state);
        assert_eq!(result, Some(UserCommand::DeleteSport(Sport::Baseball)));
        assert_eq!(
            state.dialog,
            DialogState::ConfirmDelete {
                sport: Sport::Baseball,
                dispatched: true
            },
            "dialog stays open until the refetch confirms"
        );
    }

    #[test]
    fn delete_dialog_enter_also_confirms() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(result, Some(UserCommand::DeleteSport(Sport::Baseball)));
    }

    #[test]
    fn delete_dialog_second_confirm_is_blocked() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        assert!(handle_key(key(KeyCode::Char('y')), &mut state).is_some());
        assert!(handle_key(key(KeyCode::Char('y')), &mut state).is_none());
    }

    #[test]
    fn delete_dialog_n_cancels_without_command() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        let result = handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(result.is_none());
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn delete_dialog_esc_cancels_without_command() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        let result = handle_key(key(KeyCode::Esc), &mut state);
        assert!(result.is_none());
        assert_eq!(state.dialog, DialogState::None);
    }

    #[test]
    fn delete_dialog_blocks_other_keys() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        assert!(handle_key(key(KeyCode::Char('r')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
        assert!(matches!(state.dialog, DialogState::ConfirmDelete { .. }));
    }

    // -- Refresh --

    #[test]
    fn r_returns_refresh() {
        let mut state = state_with(vec![Sport::Baseball]);
        let result = handle_key(key(KeyCode::Char('r')), &mut state);
        assert_eq!(result, Some(UserCommand::Refresh));
    }

    // -- Quit confirmation --

    #[test]
    fn q_enters_confirm_quit_mode() {
        let mut state = state_with(vec![]);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none(), "q should not send Quit immediately");
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_quit_y_sends_quit() {
        let mut state = state_with(vec![]);
        state.confirm_quit = true;
        let result = handle_key(key(KeyCode::Char('y')), &mut state);
        assert_eq!(result, Some(UserCommand::Quit));
    }

    #[test]
    fn double_q_workflow_quits() {
        let mut state = state_with(vec![]);
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(result, Some(UserCommand::Quit));
    }

    #[test]
    fn confirm_quit_n_cancels() {
        let mut state = state_with(vec![]);
        state.confirm_quit = true;
        let result = handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(result.is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_esc_cancels() {
        let mut state = state_with(vec![]);
        state.confirm_quit = true;
        let result = handle_key(key(KeyCode::Esc), &mut state);
        assert!(result.is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_blocks_other_keys() {
        let mut state = state_with(vec![Sport::Baseball]);
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_none());
        assert_eq!(state.dialog, DialogState::None);
        assert!(handle_key(key(KeyCode::Char('r')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_immediately_from_any_mode() {
        let mut state = state_with(vec![Sport::Baseball]);
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );

        state.dialog = DialogState::ConfirmDelete {
            sport: Sport::Baseball,
            dispatched: false,
        };
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );

        state.confirm_quit = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    // -- KeyEventKind filtering --

    #[test]
    fn release_events_are_ignored() {
        let mut state = state_with(vec![]);
        let release_event = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let result = handle_key(release_event, &mut state);
        assert!(result.is_none(), "Release events should be ignored");
        assert!(!state.confirm_quit);
    }

    #[test]
    fn unknown_key_returns_none() {
        let mut state = state_with(vec![]);
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
    }
}
