//! hatctl - Home Assistant controller for a 128x64 OLED HAT.
//!
//! A joystick-driven, paginated list of controllable entities with three
//! favorite shortcut keys, a live weather strip, ephemeral notifications
//! and an idle-timeout sleep mode.
//!
//! Architecture: independent producer tasks (input poller, 1 Hz tick,
//! weather/state/catalog pollers) push immutable [`event::Event`]s into
//! one unbounded queue. The [`dispatch`] loop is the queue's only consumer
//! and the only code that mutates [`view::ViewState`]; every dispatched
//! event triggers exactly one render. No locks: the queue is the only
//! synchronization point.
//!
//! Hardware and the network sit behind narrow traits
//! ([`ui::display::Surface`], [`ui::buttons::ButtonPad`],
//! [`remote::Remote`], [`storage::FavStore`]), so the whole library is
//! host-testable. The binary in `main.rs` (behind the `sim` feature)
//! wires up an SDL desktop shell; a hardware build supplies GPIO and
//! panel adapters for the same traits.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod power_logic;
pub mod remote;
#[cfg(feature = "sim")]
pub mod sim;
pub mod storage;
pub mod ui;
pub mod view;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
