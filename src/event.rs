//! Event vocabulary and the queue connecting producers to the dispatcher.
//!
//! Every producer (input poller, tick timer, remote pollers) communicates
//! with the rest of the system exclusively by pushing one of these events
//! into the shared queue. Events are immutable values; the dispatcher owns
//! the single receiver and is the only mutator of view state.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::remote::entity::{EntityState, Item};

/// Joystick directions, including the center press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickDir {
    Up,
    Down,
    Left,
    Right,
    Press,
}

/// One day of forecast: low/high temperature and a condition label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayForecast {
    pub low: f64,
    pub high: f64,
    pub condition: String,
}

/// Current temperature plus today's and tomorrow's forecast.
///
/// Compared structurally by the weather poller so that unchanged payloads
/// do not produce redundant events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Weather {
    pub now: f64,
    pub today: DayForecast,
    pub tomorrow: DayForecast,
}

/// Everything that can happen, as seen by the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// 1 Hz heartbeat; increments the idle counter.
    TimerTick,
    /// Physical input occurred; resets the idle counter (and thereby wakes
    /// a sleeping display on the next render).
    TimeoutReset,
    /// A joystick control was released after being pressed for `duration`.
    StickAction { dir: StickDir, duration: Duration },
    /// A shortcut key (0..3) was released after being pressed for `duration`.
    KeyAction { slot: usize, duration: Duration },
    /// The active control has been held past the hold threshold.
    Hold,
    /// All controls released after a hold.
    UnHold,
    /// Show a notification in the bottom bar; `None` clears it.
    SetNotification(Option<String>),
    /// The weather payload changed.
    WeatherUpdate(Weather),
    /// One entity was re-fetched and its state changed.
    StateUpdate(EntityState),
    /// The full item catalog was reloaded.
    CatalogUpdate(Vec<Item>),
    /// A remote call or decode failed; carried for logging, never fatal.
    RemoteError { cause: String },
}

/// Producer handle to the event queue.
pub type EventTx = mpsc::UnboundedSender<Event>;

/// Consumer handle to the event queue (exactly one exists).
pub type EventRx = mpsc::UnboundedReceiver<Event>;

/// Create the shared event queue.
///
/// Unbounded FIFO: enqueue never blocks a producer, and dispatch order is
/// exactly arrival order across all producers.
pub fn event_queue() -> (EventTx, EventRx) {
    mpsc::unbounded_channel()
}
