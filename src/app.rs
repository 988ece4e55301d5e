// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// results from spawned API tasks. Owns the query cache and the per-action
// mutation state machines, and pushes snapshots and toasts to the TUI render
// loop. The TUI never sees a list the server didn't confirm; the only
// optimistic artifacts are the in-flight flags.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::SportsApi;
use crate::cache::{QueryCache, QueryKey};
use crate::mutation::{MutationKind, MutationState};
use crate::protocol::{ApiEvent, SportsSnapshot, Toast, UiUpdate, UserCommand};
use crate::sport::{available_sports, Sport};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    api: Arc<dyn SportsApi>,
    cache: QueryCache,
    /// Optimistic marker for the add flow. At most one add in flight.
    add: MutationState,
    /// Optimistic marker for the delete flow. At most one delete in flight,
    /// which disables every per-sport remove affordance at once.
    delete: MutationState,
    catalog_loading: bool,
    subscriptions_loading: bool,
    catalog_failed: bool,
    subscriptions_failed: bool,
    /// A fetch was requested while one was already outstanding. The
    /// outstanding fetch may predate an invalidation, so its result cannot
    /// satisfy the request; a follow-up fetch is spawned when it settles.
    catalog_refetch_queued: bool,
    subscriptions_refetch_queued: bool,
    /// Sender for API task results; spawned tasks use a clone to report
    /// back to the main event loop.
    api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    pub fn new(api: Arc<dyn SportsApi>, api_tx: mpsc::Sender<ApiEvent>) -> Self {
        AppState {
            api,
            cache: QueryCache::new(),
            add: MutationState::Idle,
            delete: MutationState::Idle,
            catalog_loading: false,
            subscriptions_loading: false,
            catalog_failed: false,
            subscriptions_failed: false,
            catalog_refetch_queued: false,
            subscriptions_refetch_queued: false,
            api_tx,
        }
    }

    /// Spawn a catalog fetch. If one is already outstanding, queue a
    /// follow-up for when it settles instead.
    fn spawn_catalog_fetch(&mut self) {
        if self.catalog_loading {
            debug!("catalog fetch already outstanding, queueing a follow-up");
            self.catalog_refetch_queued = true;
            return;
        }
        self.catalog_loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.list_all_sports().await;
            let _ = tx.send(ApiEvent::CatalogLoaded(result)).await;
        });
    }

    /// Spawn a subscriptions fetch. If one is already outstanding, queue a
    /// follow-up for when it settles: the outstanding request may have been
    /// issued before the server applied a mutation, so its result cannot
    /// stand in for a post-invalidation read.
    fn spawn_subscriptions_fetch(&mut self) {
        if self.subscriptions_loading {
            debug!("subscriptions fetch already outstanding, queueing a follow-up");
            self.subscriptions_refetch_queued = true;
            return;
        }
        self.subscriptions_loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.list_user_sports().await;
            let _ = tx.send(ApiEvent::SubscriptionsLoaded(result)).await;
        });
    }

    fn spawn_add(&self, sport: Sport) {
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.add_sport(sport).await;
            let _ = tx.send(ApiEvent::AddFinished { sport, result }).await;
        });
    }

    fn spawn_delete(&self, sport: Sport) {
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_sport(sport).await;
            let _ = tx.send(ApiEvent::DeleteFinished { sport, result }).await;
        });
    }

    /// Build a snapshot of the current state for the TUI.
    ///
    /// `available` is recomputed here on every call — it is derived data and
    /// is never stored. Stale cache values are still rendered during a
    /// refetch window so the list doesn't flash back to a loading state
    /// after a mutation.
    pub fn build_snapshot(&self) -> SportsSnapshot {
        let catalog = self.cache.read_any(QueryKey::Catalog).unwrap_or(&[]);
        let subscribed = self.cache.read_any(QueryKey::Subscriptions).unwrap_or(&[]);

        let have_catalog = self.cache.read_any(QueryKey::Catalog).is_some();
        let have_subscriptions = self.cache.read_any(QueryKey::Subscriptions).is_some();

        let load_failed = (self.catalog_failed && !have_catalog)
            || (self.subscriptions_failed && !have_subscriptions);

        SportsSnapshot {
            catalog: catalog.to_vec(),
            subscribed: subscribed.to_vec(),
            available: available_sports(catalog, subscribed),
            loading: (!have_catalog || !have_subscriptions) && !load_failed,
            load_failed,
            add_in_flight: self.add.in_flight(),
            delete_in_flight: self.delete.in_flight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Dispatches the two initial reads, then listens on two channels using
/// `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Results from spawned API tasks
///
/// Pushes `UiUpdate`s through `ui_tx` for the TUI render loop. Returns when
/// the user quits or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Initial reads: catalog and subscriptions, independently.
    state.spawn_catalog_fetch();
    state.spawn_subscriptions_fetch();
    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = api_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_api_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        // Unreachable while AppState holds an api_tx clone,
                        // but a closed channel means nothing can ever report
                        // back, so stop.
                        warn!("API event channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;
}

async fn send_toast(ui_tx: &mpsc::Sender<UiUpdate>, toast: Toast) {
    let _ = ui_tx.send(UiUpdate::Toast(toast)).await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::AddSport(sport) => {
            // The dialog only offers available sports, but the server list
            // may have moved underneath it.
            if let Some(subscribed) = state.cache.read_any(QueryKey::Subscriptions) {
                if subscribed.contains(&sport) {
                    warn!(%sport, "add requested for an already-subscribed sport, ignoring");
                    return;
                }
            }
            if !state.add.dispatch(sport) {
                debug!(%sport, "add mutation already outstanding, ignoring");
                return;
            }
            info!(%sport, "dispatching add");
            state.spawn_add(sport);
            send_snapshot(state, ui_tx).await;
        }

        UserCommand::DeleteSport(sport) => {
            if let Some(subscribed) = state.cache.read_any(QueryKey::Subscriptions) {
                if !subscribed.contains(&sport) {
                    warn!(%sport, "delete requested for an unsubscribed sport, ignoring");
                    return;
                }
            }
            if !state.delete.dispatch(sport) {
                debug!(%sport, "delete mutation already outstanding, ignoring");
                return;
            }
            info!(%sport, "dispatching delete");
            state.spawn_delete(sport);
            send_snapshot(state, ui_tx).await;
        }

        UserCommand::Refresh => {
            info!("refresh requested, invalidating both queries");
            state.cache.invalidate(QueryKey::Catalog);
            state.cache.invalidate(QueryKey::Subscriptions);
            state.catalog_failed = false;
            state.subscriptions_failed = false;
            state.spawn_catalog_fetch();
            state.spawn_subscriptions_fetch();
            send_snapshot(state, ui_tx).await;
        }

        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Handle the result of a spawned API task.
async fn handle_api_event(
    state: &mut AppState,
    event: ApiEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        ApiEvent::CatalogLoaded(Ok(catalog)) => {
            info!(count = catalog.len(), "catalog loaded");
            state.catalog_loading = false;
            state.catalog_failed = false;
            state.cache.store(QueryKey::Catalog, catalog);
            if state.catalog_refetch_queued {
                state.catalog_refetch_queued = false;
                state.spawn_catalog_fetch();
            }
            send_snapshot(state, ui_tx).await;
        }
        ApiEvent::CatalogLoaded(Err(e)) => {
            warn!("catalog fetch failed: {e}");
            state.catalog_loading = false;
            state.catalog_failed = true;
            if state.catalog_refetch_queued {
                state.catalog_refetch_queued = false;
                state.spawn_catalog_fetch();
            }
            send_toast(ui_tx, Toast::error("Couldn't load sports")).await;
            send_snapshot(state, ui_tx).await;
        }

        ApiEvent::SubscriptionsLoaded(Ok(subscribed)) => {
            info!(count = subscribed.len(), "subscriptions loaded");
            state.subscriptions_loading = false;
            state.subscriptions_failed = false;
            // Clear confirmed mutations whose outcome the fresh list now
            // reflects. This is what lets the TUI close the add dialog and
            // drop pending markers.
            state.add.reconcile(MutationKind::Add, &subscribed);
            state.delete.reconcile(MutationKind::Delete, &subscribed);
            state.cache.store(QueryKey::Subscriptions, subscribed);
            // A fetch requested mid-flight (post-mutation invalidation, or
            // a refresh) still needs its own round trip; the list that just
            // landed predates it.
            if state.subscriptions_refetch_queued {
                state.subscriptions_refetch_queued = false;
                state.spawn_subscriptions_fetch();
            }
            send_snapshot(state, ui_tx).await;
        }
        ApiEvent::SubscriptionsLoaded(Err(e)) => {
            warn!("subscriptions fetch failed: {e}");
            state.subscriptions_loading = false;
            state.subscriptions_failed = true;
            if state.subscriptions_refetch_queued {
                state.subscriptions_refetch_queued = false;
                state.spawn_subscriptions_fetch();
            }
            send_toast(ui_tx, Toast::error("Couldn't load your sports")).await;
            send_snapshot(state, ui_tx).await;
        }

        ApiEvent::AddFinished { sport, result } => match result {
            Ok(echoed) => {
                if echoed != sport {
                    warn!(%sport, %echoed, "add echo mismatch");
                }
                info!(%sport, "add succeeded");
                state.add.settle_success();
                state.cache.invalidate(QueryKey::Subscriptions);
                state.spawn_subscriptions_fetch();
                send_toast(
                    ui_tx,
                    Toast::success(format!("{} added to your sports", sport.display_name())),
                )
                .await;
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => {
                warn!(%sport, "add failed: {e}");
                state.add.settle_failure();
                send_toast(ui_tx, Toast::error("Couldn't add sport")).await;
                send_snapshot(state, ui_tx).await;
            }
        },

        ApiEvent::DeleteFinished { sport, result } => match result {
            Ok(echoed) => {
                if echoed != sport {
                    warn!(%sport, %echoed, "delete echo mismatch");
                }
                info!(%sport, "delete succeeded");
                state.delete.settle_success();
                state.cache.invalidate(QueryKey::Subscriptions);
                state.spawn_subscriptions_fetch();
                send_toast(
                    ui_tx,
                    Toast::success(format!(
                        "{} removed from your sports",
                        sport.display_name()
                    )),
                )
                .await;
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => {
                warn!(%sport, "delete failed: {e}");
                state.delete.settle_failure();
                send_toast(ui_tx, Toast::error("Couldn't remove sport")).await;
                send_snapshot(state, ui_tx).await;
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::time::Duration;

    struct NullApi;

    #[async_trait::async_trait]
    impl SportsApi for NullApi {
        async fn list_all_sports(&self) -> Result<Vec<Sport>, ApiError> {
            Ok(Sport::ALL.to_vec())
        }
        async fn list_user_sports(&self) -> Result<Vec<Sport>, ApiError> {
            Ok(vec![])
        }
        async fn add_sport(&self, sport: Sport) -> Result<Sport, ApiError> {
            Ok(sport)
        }
        async fn delete_sport(&self, sport: Sport) -> Result<Sport, ApiError> {
            Ok(sport)
        }
    }

    fn test_state() -> (AppState, mpsc::Receiver<ApiEvent>) {
        let (api_tx, api_rx) = mpsc::channel(32);
        (AppState::new(Arc::new(NullApi), api_tx), api_rx)
    }

    fn status(status_code: u16) -> ApiError {
        ApiError::Status(reqwest::StatusCode::from_u16(status_code).unwrap())
    }

    #[tokio::test]
    async fn initial_snapshot_is_loading() {
        let (state, _api_rx) = test_state();
        let snapshot = state.build_snapshot();
        assert!(snapshot.loading);
        assert!(!snapshot.load_failed);
        assert!(snapshot.catalog.is_empty());
    }

    #[tokio::test]
    async fn snapshot_available_is_catalog_minus_subscribed() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        handle_api_event(
            &mut state,
            ApiEvent::CatalogLoaded(Ok(vec![
                Sport::Baseball,
                Sport::Basketball,
                Sport::Football,
            ])),
            &ui_tx,
        )
        .await;
        handle_api_event(
            &mut state,
            ApiEvent::SubscriptionsLoaded(Ok(vec![Sport::Baseball])),
            &ui_tx,
        )
        .await;

        let snapshot = state.build_snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.available, vec![Sport::Basketball, Sport::Football]);

        // Both handlers pushed snapshots too.
        assert!(ui_rx.recv().await.is_some());
        assert!(ui_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn add_success_invalidates_and_refetches_subscriptions() {
        let (mut state, mut api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        state.cache.store(QueryKey::Catalog, Sport::ALL.to_vec());
        state.cache.store(QueryKey::Subscriptions, vec![]);
        state.add.dispatch(Sport::Tennis);

        handle_api_event(
            &mut state,
            ApiEvent::AddFinished {
                sport: Sport::Tennis,
                result: Ok(Sport::Tennis),
            },
            &ui_tx,
        )
        .await;

        // Success toast naming the sport.
        let update = ui_rx.recv().await.unwrap();
        match update {
            UiUpdate::Toast(toast) => {
                assert_eq!(toast.kind, crate::protocol::ToastKind::Success);
                assert!(toast.message.contains("Tennis"), "{}", toast.message);
            }
            other => panic!("expected toast, got: {other:?}"),
        }

        // Subscriptions were invalidated and a refetch task spawned.
        assert!(!state.cache.is_fresh(QueryKey::Subscriptions));
        let refetch = tokio::time::timeout(Duration::from_secs(1), api_rx.recv())
            .await
            .expect("refetch should report back")
            .unwrap();
        assert!(matches!(refetch, ApiEvent::SubscriptionsLoaded(_)));
    }

    #[tokio::test]
    async fn add_failure_emits_error_toast_and_allows_retry() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        state.cache.store(QueryKey::Subscriptions, vec![]);
        state.add.dispatch(Sport::Tennis);

        handle_api_event(
            &mut state,
            ApiEvent::AddFinished {
                sport: Sport::Tennis,
                result: Err(status(500)),
            },
            &ui_tx,
        )
        .await;

        let update = ui_rx.recv().await.unwrap();
        assert_eq!(update, UiUpdate::Toast(Toast::error("Couldn't add sport")));

        // Local state untouched, cache still fresh, retry accepted.
        assert!(state.cache.is_fresh(QueryKey::Subscriptions));
        assert!(!state.add.in_flight());
        assert!(state.add.dispatch(Sport::Tennis));
    }

    #[tokio::test]
    async fn second_add_while_pending_is_ignored() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        state.cache.store(QueryKey::Subscriptions, vec![]);

        handle_user_command(&mut state, UserCommand::AddSport(Sport::Tennis), &ui_tx).await;
        assert!(state.add.in_flight());
        // Snapshot from the first dispatch.
        assert!(ui_rx.recv().await.is_some());

        handle_user_command(&mut state, UserCommand::AddSport(Sport::Soccer), &ui_tx).await;
        // Second dispatch rejected: still pending on tennis, no new snapshot.
        assert_eq!(state.add.sport(), Some(Sport::Tennis));
        assert!(ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn add_for_subscribed_sport_is_ignored() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        state
            .cache
            .store(QueryKey::Subscriptions, vec![Sport::Tennis]);

        handle_user_command(&mut state, UserCommand::AddSport(Sport::Tennis), &ui_tx).await;
        assert!(!state.add.in_flight());
        assert!(ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn subscriptions_reload_reconciles_confirmed_add() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, _ui_rx) = mpsc::channel(32);

        state.add.dispatch(Sport::Tennis);
        state.add.settle_success();
        assert_eq!(state.add, MutationState::Confirmed(Sport::Tennis));

        handle_api_event(
            &mut state,
            ApiEvent::SubscriptionsLoaded(Ok(vec![Sport::Tennis])),
            &ui_tx,
        )
        .await;

        assert_eq!(state.add, MutationState::Idle);
    }

    #[tokio::test]
    async fn load_failure_surfaces_error_state() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        handle_api_event(&mut state, ApiEvent::CatalogLoaded(Err(status(502))), &ui_tx).await;

        let update = ui_rx.recv().await.unwrap();
        assert_eq!(update, UiUpdate::Toast(Toast::error("Couldn't load sports")));

        let snapshot = state.build_snapshot();
        assert!(snapshot.load_failed);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn refresh_invalidates_both_queries() {
        let (mut state, mut api_rx) = test_state();
        let (ui_tx, _ui_rx) = mpsc::channel(32);

        state.cache.store(QueryKey::Catalog, Sport::ALL.to_vec());
        state.cache.store(QueryKey::Subscriptions, vec![]);

        handle_user_command(&mut state, UserCommand::Refresh, &ui_tx).await;

        assert!(!state.cache.is_fresh(QueryKey::Catalog));
        assert!(!state.cache.is_fresh(QueryKey::Subscriptions));

        // Both fetch tasks report back.
        let mut seen = Vec::new();
        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(1), api_rx.recv())
                .await
                .expect("fetch should report back")
                .unwrap();
            seen.push(std::mem::discriminant(&event));
        }
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn mutation_refetch_queues_behind_an_outstanding_fetch() {
        let (mut state, _api_rx) = test_state();
        let (ui_tx, _ui_rx) = mpsc::channel(32);

        state.cache.store(QueryKey::Catalog, Sport::ALL.to_vec());
        state
            .cache
            .store(QueryKey::Subscriptions, vec![Sport::Baseball]);
        state.delete.dispatch(Sport::Baseball);

        // Manual refresh while the delete is still in flight.
        handle_user_command(&mut state, UserCommand::Refresh, &ui_tx).await;
        assert!(state.subscriptions_loading);

        // The delete settles first. Its refetch can't start while the
        // refresh's fetch is outstanding, so it queues instead of dropping.
        handle_api_event(
            &mut state,
            ApiEvent::DeleteFinished {
                sport: Sport::Baseball,
                result: Ok(Sport::Baseball),
            },
            &ui_tx,
        )
        .await;
        assert_eq!(state.delete, MutationState::Confirmed(Sport::Baseball));

        // The refresh's fetch lands carrying the pre-delete list. It cannot
        // reconcile the delete, but it must trigger the queued follow-up.
        handle_api_event(
            &mut state,
            ApiEvent::SubscriptionsLoaded(Ok(vec![Sport::Baseball])),
            &ui_tx,
        )
        .await;
        assert!(state.subscriptions_loading);
        assert_eq!(state.delete, MutationState::Confirmed(Sport::Baseball));

        // The follow-up lands with the post-delete list and reconciles.
        handle_api_event(&mut state, ApiEvent::SubscriptionsLoaded(Ok(vec![])), &ui_tx).await;
        assert_eq!(state.delete, MutationState::Idle);
        assert!(state.delete.dispatch(Sport::Baseball));
    }
}
