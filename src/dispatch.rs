//! Event dispatch: the single consumer of the queue and the single
//! mutator of view state.
//!
//! The run loop pulls one event at a time, applies exactly one handler
//! for its kind, re-renders unconditionally, then enqueues the handler's
//! follow-up event if it produced one. Handlers never wait on network
//! I/O; remote actions go through the fire-and-forget [`Remote`]
//! capability and report back as later events.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use crate::config::{HOLD_DURATION_MS, NOTIFICATION_SECS};
use crate::event::{Event, EventRx, EventTx, StickDir};
use crate::remote::poll::RefreshPlan;
use crate::remote::Remote;
use crate::storage::FavStore;
use crate::ui::display::{render, Surface};
use crate::ui::input_logic::{page_back, page_forward, select_next, select_prev};
use crate::view::ViewState;

fn hold_threshold() -> Duration {
    Duration::from_millis(HOLD_DURATION_MS)
}

pub struct Dispatcher<R, F> {
    pub view: ViewState,
    remote: R,
    store: F,
    tx: EventTx,
    /// At most one notification clear is ever scheduled; a newer
    /// notification supersedes (aborts) the old timer.
    pending_clear: Option<JoinHandle<()>>,
}

impl<R: Remote, F: FavStore> Dispatcher<R, F> {
    pub fn new(view: ViewState, remote: R, store: F, tx: EventTx) -> Self {
        Self {
            view,
            remote,
            store,
            tx,
            pending_clear: None,
        }
    }

    /// Apply the single handler for `event`.
    ///
    /// Returns an immediate follow-up for the loop to enqueue. Must run
    /// inside a Tokio runtime: showing a notification schedules its clear
    /// timer on it.
    pub fn dispatch(&mut self, event: Event) -> Option<Event> {
        trace!(?event, "dispatch");
        match event {
            Event::TimerTick => {
                self.view.idle_secs = self.view.idle_secs.saturating_add(1);
                None
            }
            Event::TimeoutReset => {
                self.view.idle_secs = 0;
                None
            }
            Event::StickAction { dir, duration } => {
                self.on_stick(dir, duration);
                None
            }
            Event::KeyAction { slot, duration } => self.on_key(slot, duration),
            Event::Hold => {
                self.view.hold = true;
                None
            }
            Event::UnHold => {
                self.view.hold = false;
                None
            }
            Event::SetNotification(text) => {
                self.on_notification(text);
                None
            }
            Event::WeatherUpdate(weather) => {
                info!(now = weather.now, "weather updated");
                self.view.weather = weather;
                None
            }
            Event::StateUpdate(state) => {
                if !self.view.apply_state(state) {
                    debug!("state update for an entity no longer in the catalog");
                }
                None
            }
            Event::CatalogUpdate(items) => {
                debug!(items = items.len(), "catalog replaced");
                self.view.replace_catalog(items);
                None
            }
            Event::RemoteError { cause } => {
                warn!(%cause, "remote error");
                None
            }
        }
    }

    /// Joystick release. Navigation is ignored while asleep; the reset
    /// event accompanying the same press already handled the wake.
    fn on_stick(&mut self, dir: StickDir, duration: Duration) {
        if self.view.asleep() {
            return;
        }
        let count = self.view.catalog.len();
        match dir {
            StickDir::Up => self.view.idx = select_prev(self.view.idx, count),
            StickDir::Down => self.view.idx = select_next(self.view.idx, count),
            StickDir::Right => self.view.idx = page_forward(self.view.idx, count),
            StickDir::Left => self.view.idx = page_back(self.view.idx),
            StickDir::Press if duration > hold_threshold() => {
                if let Some(item) = self.view.selected() {
                    self.remote.toggle(item);
                }
            }
            // A short center press is reserved; only a long press toggles.
            StickDir::Press => {}
        }
    }

    /// Shortcut key release: long press binds the slot to the selected
    /// item and persists, short press fires the bound item.
    fn on_key(&mut self, slot: usize, duration: Duration) -> Option<Event> {
        if duration > hold_threshold() {
            let (id, label) = match self.view.selected() {
                Some(item) => (item.id().to_owned(), item.label()),
                None => return None,
            };
            *self.view.favs.get_mut(slot)? = Some(id);
            if let Err(e) = self.store.save(&self.view.favs) {
                // Degrade without persistence; the next hold retries.
                error!(error = %e, "favorites not persisted");
            }
            Some(Event::SetNotification(Some(label)))
        } else {
            let fav = self.view.favs.get(slot)?.clone()?;
            if let Some(item) = self.view.find(&fav) {
                self.remote.toggle(item);
            }
            None
        }
    }

    fn on_notification(&mut self, text: Option<String>) {
        if let Some(timer) = self.pending_clear.take() {
            timer.abort();
        }
        let shown = text.is_some();
        self.view.notification = text;
        if shown {
            let tx = self.tx.clone();
            self.pending_clear = Some(tokio::spawn(async move {
                sleep(Duration::from_secs(NOTIFICATION_SECS)).await;
                let _ = tx.send(Event::SetNotification(None));
            }));
        }
    }
}

/// Consume the queue until it closes.
///
/// Per event: dispatch, render (unconditionally, even when nothing
/// changed), enqueue the follow-up, publish the refresh plan snapshot.
pub async fn run<R, F, S>(
    mut dispatcher: Dispatcher<R, F>,
    mut rx: EventRx,
    tx: EventTx,
    mut surface: S,
    plan_tx: watch::Sender<RefreshPlan>,
) where
    R: Remote,
    F: FavStore,
    S: Surface,
{
    while let Some(event) = rx.recv().await {
        let follow_up = dispatcher.dispatch(event);
        render(&dispatcher.view, &mut surface);
        if let Some(event) = follow_up {
            let _ = tx.send(event);
        }
        publish_plan(&dispatcher.view, &plan_tx);
    }
}

/// Hand the refresher an updated snapshot when it actually changed.
pub fn publish_plan(view: &ViewState, plan_tx: &watch::Sender<RefreshPlan>) {
    let plan = RefreshPlan {
        ids: view.refresh_ids(),
        asleep: view.asleep(),
    };
    plan_tx.send_if_modified(|current| {
        if *current == plan {
            false
        } else {
            *current = plan;
            true
        }
    });
}
