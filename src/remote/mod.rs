//! Remote state service subsystem.
//!
//! Talks to the Home Assistant REST API and feeds the event queue:
//!
//! 1. **Client** - authenticated endpoint wrappers and payload decoding.
//! 2. **Entity** - the catalog model (rich entities vs. bare script
//!    actions) and its filtering rules.
//! 3. **Pollers** - long-running producer tasks for weather, entity
//!    refresh, and catalog reload.
//!
//! Event handlers reach back into the service through the [`Remote`]
//! capability, which never blocks the dispatch loop.

pub mod client;
pub mod entity;
pub mod poll;

use tracing::warn;

use crate::event::{Event, EventTx};
use client::HaClient;
use entity::Item;

/// Fire-and-forget remote actions available to event handlers.
///
/// Implementations run the call in the background and report the outcome
/// through the event queue; the dispatch loop never waits on network I/O.
pub trait Remote {
    /// Toggle an entity or invoke a bare action.
    fn toggle(&self, item: &Item);
}

/// Live [`Remote`] backed by [`HaClient`].
pub struct HaRemote {
    client: HaClient,
    tx: EventTx,
}

impl HaRemote {
    pub fn new(client: HaClient, tx: EventTx) -> Self {
        Self { client, tx }
    }
}

impl Remote for HaRemote {
    fn toggle(&self, item: &Item) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let item = item.clone();
        tokio::spawn(async move {
            match client.toggle(&item).await {
                // Entity toggles report the fresh state right away.
                Ok(Some(state)) => {
                    let _ = tx.send(Event::StateUpdate(state));
                }
                // Bare actions have no state to report.
                Ok(None) => {}
                Err(e) => {
                    warn!(item = item.id(), error = %e, "toggle failed");
                    let _ = tx.send(Event::RemoteError {
                        cause: e.to_string(),
                    });
                }
            }
        });
    }
}
