//! Joystick and shortcut-key sampling with hold detection.
//!
//! The eight controls (directional pad with center press + three shortcut
//! keys, active-low on the HAT) are sampled every 20 ms. Debouncing falls
//! out of the sampling cadence: a bounce shorter than one sample period is
//! never observed. The scanner tracks a single active control at a time;
//! when several read pressed in one sample, an explicit [`TieBreak`] policy
//! picks the winner.
//!
//! [`PadScanner`] is the pure per-sample state machine (host-testable);
//! [`poll_task`] wraps it in the fixed-cadence producer loop.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::config::{HOLD_DURATION_MS, SAMPLE_INTERVAL_MS};
use crate::event::{Event, EventTx, StickDir};

/// One physical control, in scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Press,
    Key1,
    Key2,
    Key3,
}

impl Control {
    /// Scan order used by the tie-break policies.
    pub const SCAN_ORDER: [Control; 8] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Press,
        Control::Key1,
        Control::Key2,
        Control::Key3,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    /// The release edge event for this control's category.
    fn edge_event(self, duration: Duration) -> Event {
        match self {
            Control::Up => Event::StickAction { dir: StickDir::Up, duration },
            Control::Down => Event::StickAction { dir: StickDir::Down, duration },
            Control::Left => Event::StickAction { dir: StickDir::Left, duration },
            Control::Right => Event::StickAction { dir: StickDir::Right, duration },
            Control::Press => Event::StickAction { dir: StickDir::Press, duration },
            Control::Key1 => Event::KeyAction { slot: 0, duration },
            Control::Key2 => Event::KeyAction { slot: 1, duration },
            Control::Key3 => Event::KeyAction { slot: 2, duration },
        }
    }
}

/// One sample of all eight controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PadState(u8);

impl PadState {
    /// No control pressed.
    pub const IDLE: PadState = PadState(0);

    pub fn with(self, control: Control, pressed: bool) -> Self {
        if pressed {
            PadState(self.0 | control.bit())
        } else {
            PadState(self.0 & !control.bit())
        }
    }

    pub fn pressed(self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    pub fn any(self) -> bool {
        self.0 != 0
    }
}

/// Precedence when several controls read pressed in the same sample.
///
/// The physical stick cannot report two directions at once, but a shortcut
/// key can overlap a stick press. Upstream hardware defines no precedence,
/// so the policy is explicit: both variants walk [`Control::SCAN_ORDER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// First pressed control in scan order wins (the stick).
    PreferFirst,
    /// Last pressed control in scan order wins (the shortcut keys).
    PreferLast,
}

impl TieBreak {
    /// Pick the active control for one sample.
    pub fn resolve(self, state: PadState) -> Option<Control> {
        let mut found = None;
        for control in Control::SCAN_ORDER {
            if state.pressed(control) {
                found = Some(control);
                if self == TieBreak::PreferFirst {
                    break;
                }
            }
        }
        found
    }
}

/// Sampled digital inputs, one [`PadState`] per call.
///
/// The GPIO adapter reads the active-low pins listed in `config`; the
/// desktop shell synthesizes states from keyboard events.
pub trait ButtonPad {
    fn sample(&mut self) -> PadState;
}

fn hold_threshold() -> Duration {
    Duration::from_millis(HOLD_DURATION_MS)
}

fn sample_period() -> Duration {
    Duration::from_millis(SAMPLE_INTERVAL_MS)
}

/// Per-sample input state machine.
///
/// Tracks the single active control and its accumulated press duration.
/// On a change of active control it emits the previous control's edge
/// event (carrying the accumulated duration) followed by a
/// [`Event::TimeoutReset`], then zeroes the accumulator; a press edge from
/// idle therefore emits only the reset, and the edge event arrives on
/// release. [`Event::Hold`] fires exactly once per episode when the
/// accumulator strictly exceeds the hold threshold; the episode ends (and
/// [`Event::UnHold`] fires) only when all controls read released, so
/// rolling directly from one control to another does not restart it.
pub struct PadScanner {
    tie_break: TieBreak,
    active: Option<Control>,
    duration: Duration,
    hold_sent: bool,
}

impl PadScanner {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            active: None,
            duration: Duration::ZERO,
            hold_sent: false,
        }
    }

    /// Advance by one sample period. Returned events are in emission order.
    pub fn step(&mut self, sampled: PadState) -> Vec<Event> {
        let mut out = Vec::new();
        self.duration += sample_period();

        let active = self.tie_break.resolve(sampled);
        if active != self.active {
            if let Some(prev) = self.active {
                out.push(prev.edge_event(self.duration));
            }
            out.push(Event::TimeoutReset);
            self.duration = Duration::ZERO;
        }
        if active.is_some() && !self.hold_sent && self.duration > hold_threshold() {
            self.hold_sent = true;
            out.push(Event::Hold);
        }
        if active.is_none() && self.hold_sent {
            self.hold_sent = false;
            out.push(Event::UnHold);
        }
        self.active = active;
        out
    }
}

/// Run the input producer until the queue closes.
pub async fn poll_task<P: ButtonPad>(mut pad: P, tie_break: TieBreak, tx: EventTx) {
    let mut scanner = PadScanner::new(tie_break);
    let mut ticker = interval(sample_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        for event in scanner.step(pad.sample()) {
            trace!(?event, "input");
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}
