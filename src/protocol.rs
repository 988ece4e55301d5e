// Message types exchanged over the mpsc channels between the TUI, the app
// orchestrator, and spawned API tasks.

use crate::api::ApiError;
use crate::sport::Sport;

// ---------------------------------------------------------------------------
// UserCommand (TUI -> orchestrator)
// ---------------------------------------------------------------------------

/// A user action that requires the orchestrator (everything touching the
/// remote API or the cache). Purely local interactions — selection movement,
/// opening and closing dialogs — stay inside the TUI's `ViewState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Subscribe to a sport (confirmed from the add dialog).
    AddSport(Sport),
    /// Unsubscribe from a sport (confirmed from the delete dialog).
    DeleteSport(Sport),
    /// Invalidate both queries and refetch from the server.
    Refresh,
    /// Shut down.
    Quit,
}

// ---------------------------------------------------------------------------
// ApiEvent (spawned API tasks -> orchestrator)
// ---------------------------------------------------------------------------

/// The result of a spawned API task, reported back to the orchestrator loop.
#[derive(Debug)]
pub enum ApiEvent {
    CatalogLoaded(Result<Vec<Sport>, ApiError>),
    SubscriptionsLoaded(Result<Vec<Sport>, ApiError>),
    AddFinished {
        sport: Sport,
        result: Result<Sport, ApiError>,
    },
    DeleteFinished {
        sport: Sport,
        result: Result<Sport, ApiError>,
    },
}

// ---------------------------------------------------------------------------
// UiUpdate (orchestrator -> TUI)
// ---------------------------------------------------------------------------

/// Everything the TUI needs to render, rebuilt by the orchestrator after any
/// state change. The TUI never synthesizes list contents itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SportsSnapshot {
    /// Full sport catalog (server-confirmed).
    pub catalog: Vec<Sport>,
    /// The user's subscribed sports (server-confirmed, possibly one refetch
    /// behind a confirmed mutation).
    pub subscribed: Vec<Sport>,
    /// Catalog minus subscriptions, recomputed for this snapshot.
    pub available: Vec<Sport>,
    /// True until both initial reads have produced a value.
    pub loading: bool,
    /// True when an initial read failed and no value has ever been stored
    /// for it; the UI offers a retry instead of a spinner.
    pub load_failed: bool,
    /// An add request is in flight.
    pub add_in_flight: bool,
    /// A delete request is in flight (disables every remove affordance).
    pub delete_in_flight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification shown by the TUI until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// An update pushed from the orchestrator to the TUI render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Snapshot(Box<SportsSnapshot>),
    Toast(Toast),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
