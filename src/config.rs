//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and layout
//! constants live here so they can be tuned in one place.

// Idle / sleep

/// Seconds without physical input before the display goes to sleep.
/// The counter must strictly exceed this value.
pub const IDLE_TIMEOUT_SECS: u32 = 300;

/// Idle tick cadence (seconds). One tick increments the idle counter by one.
pub const TICK_INTERVAL_SECS: u64 = 1;

// Input

/// Input sampling cadence (ms).
pub const SAMPLE_INTERVAL_MS: u64 = 20;

/// Minimum press duration (ms) that counts as a hold rather than a tap.
pub const HOLD_DURATION_MS: u64 = 400;

/// Number of favorite shortcut slots (one per shortcut key).
pub const FAV_SLOTS: usize = 3;

// GPIO pin assignments (BCM numbering, Waveshare 1.3" OLED HAT)
//
// The joystick and keys are active-low with internal pull-ups. The pins
// are listed here for the hardware `ButtonPad` adapter; the library only
// sees sampled states.

/// Joystick up.
pub const KEY_UP_PIN: u8 = 6;
/// Joystick down.
pub const KEY_DOWN_PIN: u8 = 19;
/// Joystick left.
pub const KEY_LEFT_PIN: u8 = 5;
/// Joystick right.
pub const KEY_RIGHT_PIN: u8 = 26;
/// Joystick center press.
pub const KEY_PRESS_PIN: u8 = 13;
/// Shortcut key 1 (top).
pub const KEY1_PIN: u8 = 21;
/// Shortcut key 2 (middle).
pub const KEY2_PIN: u8 = 20;
/// Shortcut key 3 (bottom).
pub const KEY3_PIN: u8 = 16;

// Display

/// Display width (px).
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height (px).
pub const DISPLAY_HEIGHT: u32 = 64;

/// Contrast applied while awake. 0 keeps the panel dim for bedside use.
pub const DISPLAY_CONTRAST: u8 = 0;

/// Catalog rows shown per page; also the horizontal navigation jump.
pub const PAGE_SIZE: usize = 5;

// Remote state service

/// Entity id of the weather provider polled for the bottom bar.
pub const WEATHER_ENTITY_ID: &str = "weather.openweathermap";

/// Weather poll interval (seconds).
pub const WEATHER_POLL_SECS: u64 = 10 * 60;

/// Full catalog reload interval (seconds).
pub const CATALOG_RELOAD_SECS: u64 = 60 * 60;

/// Refresh interval for visible + favorite entities while awake (seconds).
pub const STATE_REFRESH_AWAKE_SECS: u64 = 5;

/// Poll interval for the refresh plan while asleep (seconds). Kept short
/// so refreshing resumes right after waking up.
pub const STATE_REFRESH_ASLEEP_SECS: u64 = 1;

// Notifications

/// How long a notification stays on screen before it self-clears (seconds).
pub const NOTIFICATION_SECS: u64 = 2;
