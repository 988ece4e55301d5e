// Optimistic mutation state machine.
//
// One `MutationState` instance exists per action type (add, delete). It
// tracks a dispatched mutation from the moment the request is spawned until
// the server-confirmed subscription list reflects the outcome:
//
//   Idle --dispatch--> Pending --server ok--> Confirmed --membership--> Idle
//                         |
//                         +----server err--> Failed --dispatch--> Pending
//
// `Pending` means a request is in flight; dispatching again in that window is
// rejected, which is what serializes mutations to at most one per action
// type.

use crate::sport::Sport;

// ---------------------------------------------------------------------------
// MutationKind
// ---------------------------------------------------------------------------

/// Which direction a mutation moves a sport: onto or off the subscription
/// list. Determines what "the list reflects the outcome" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Delete,
}

// ---------------------------------------------------------------------------
// MutationState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    /// No mutation outstanding.
    #[default]
    Idle,
    /// Request dispatched, awaiting the server's response.
    Pending(Sport),
    /// Server accepted; awaiting the refetched subscription list to reflect
    /// the change.
    Confirmed(Sport),
    /// Server rejected. Retryable: a new dispatch is accepted from here.
    Failed(Sport),
}

impl MutationState {
    /// Begin a mutation for `sport`. Returns `false` (and leaves the state
    /// untouched) when a request is already in flight or a confirmed
    /// outcome is still reconciling.
    pub fn dispatch(&mut self, sport: Sport) -> bool {
        match self {
            MutationState::Idle | MutationState::Failed(_) => {
                *self = MutationState::Pending(sport);
                true
            }
            MutationState::Pending(_) | MutationState::Confirmed(_) => false,
        }
    }

    /// Record a successful server response. Returns the sport when the
    /// transition applies; a success landing in any other state is stale
    /// and ignored.
    pub fn settle_success(&mut self) -> Option<Sport> {
        match *self {
            MutationState::Pending(sport) => {
                *self = MutationState::Confirmed(sport);
                Some(sport)
            }
            _ => None,
        }
    }

    /// Record a failed server response. Returns the sport when the
    /// transition applies.
    pub fn settle_failure(&mut self) -> Option<Sport> {
        match *self {
            MutationState::Pending(sport) => {
                *self = MutationState::Failed(sport);
                Some(sport)
            }
            _ => None,
        }
    }

    /// Clear a confirmed mutation once the refreshed subscription list
    /// reflects its outcome. Returns `true` when the state moved back to
    /// `Idle`.
    pub fn reconcile(&mut self, kind: MutationKind, subscribed: &[Sport]) -> bool {
        let MutationState::Confirmed(sport) = *self else {
            return false;
        };
        let reflected = match kind {
            MutationKind::Add => subscribed.contains(&sport),
            MutationKind::Delete => !subscribed.contains(&sport),
        };
        if reflected {
            *self = MutationState::Idle;
        }
        reflected
    }

    /// Whether a request is currently in flight.
    pub fn in_flight(&self) -> bool {
        matches!(self, MutationState::Pending(_))
    }

    /// The sport the current marker refers to, if any.
    pub fn sport(&self) -> Option<Sport> {
        match *self {
            MutationState::Idle => None,
            MutationState::Pending(s)
            | MutationState::Confirmed(s)
            | MutationState::Failed(s) => Some(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
