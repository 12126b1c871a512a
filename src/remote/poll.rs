//! Producer tasks feeding the event queue.
//!
//! Each task loops until the queue closes, sleeping at its own cadence.
//! Remote failures become `RemoteError` events; no task ever terminates
//! because of one.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{
    CATALOG_RELOAD_SECS, STATE_REFRESH_ASLEEP_SECS, STATE_REFRESH_AWAKE_SECS, TICK_INTERVAL_SECS,
    WEATHER_POLL_SECS,
};
use crate::event::{Event, EventTx, Weather};
use crate::remote::client::HaClient;
use crate::remote::entity::EntityState;

/// What the state refresher should be looking at, published by the run
/// loop after every dispatch. Producers only ever read the latest value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshPlan {
    /// Entity ids currently worth refreshing: visible page + favorites.
    pub ids: Vec<String>,
    /// When asleep, refreshing pauses (the probe cadence stays short so it
    /// resumes promptly after a wake).
    pub asleep: bool,
}

/// 1 Hz heartbeat driving the idle counter.
pub async fn tick_task(tx: EventTx) {
    loop {
        sleep(Duration::from_secs(TICK_INTERVAL_SECS)).await;
        if tx.send(Event::TimerTick).is_err() {
            return;
        }
    }
}

/// Record `next` in the cache, reporting whether it differed from the
/// previously recorded value.
pub(crate) fn diff_latch<T: PartialEq + Clone>(cache: &mut Option<T>, next: &T) -> bool {
    if cache.as_ref() == Some(next) {
        return false;
    }
    *cache = Some(next.clone());
    true
}

/// Record one entity in the per-id cache, reporting whether it changed.
pub(crate) fn entity_changed(cache: &mut HashMap<String, EntityState>, next: &EntityState) -> bool {
    if cache.get(&next.entity_id) == Some(next) {
        return false;
    }
    cache.insert(next.entity_id.clone(), next.clone());
    true
}

/// Poll the weather entity, emitting an update only when the decoded
/// payload differs from the last emitted one.
pub async fn weather_task(client: HaClient, tx: EventTx) {
    let mut cache: Option<Weather> = None;
    loop {
        let event = match client.weather().await {
            Ok(weather) => diff_latch(&mut cache, &weather).then_some(Event::WeatherUpdate(weather)),
            Err(e) => {
                warn!(error = %e, "weather poll failed");
                Some(Event::RemoteError {
                    cause: e.to_string(),
                })
            }
        };
        if let Some(event) = event {
            if tx.send(event).is_err() {
                return;
            }
        }
        sleep(Duration::from_secs(WEATHER_POLL_SECS)).await;
    }
}

/// Refresh the entities named by the current [`RefreshPlan`].
///
/// One sweep fetches every planned id and emits `StateUpdate` per changed
/// entity. A failing fetch aborts the sweep with a single `RemoteError`
/// (a down server would otherwise produce one error per id).
pub async fn state_refresh_task(client: HaClient, plan_rx: watch::Receiver<RefreshPlan>, tx: EventTx) {
    let mut cache: HashMap<String, EntityState> = HashMap::new();
    loop {
        let plan = plan_rx.borrow().clone();
        if plan.asleep {
            sleep(Duration::from_secs(STATE_REFRESH_ASLEEP_SECS)).await;
            continue;
        }

        for id in &plan.ids {
            match client.state(id).await {
                Ok(state) => {
                    if entity_changed(&mut cache, &state)
                        && tx.send(Event::StateUpdate(state)).is_err()
                    {
                        return;
                    }
                }
                Err(e) => {
                    warn!(entity = %id, error = %e, "state refresh failed");
                    if tx
                        .send(Event::RemoteError {
                            cause: e.to_string(),
                        })
                        .is_err()
                    {
                        return;
                    }
                    break;
                }
            }
        }

        sleep(Duration::from_secs(STATE_REFRESH_AWAKE_SECS)).await;
    }
}

/// Reload the full catalog on a slow cadence.
pub async fn catalog_task(client: HaClient, tx: EventTx) {
    loop {
        sleep(Duration::from_secs(CATALOG_RELOAD_SECS)).await;
        let event = match client.load_catalog().await {
            Ok(items) => {
                debug!(items = items.len(), "catalog reloaded");
                Event::CatalogUpdate(items)
            }
            Err(e) => {
                warn!(error = %e, "catalog reload failed");
                Event::RemoteError {
                    cause: e.to_string(),
                }
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}
