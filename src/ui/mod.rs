//! User interface subsystem - OLED rendering + physical controls.
//!
//! ## Components
//!
//! - **Display**: whole-frame rendering from view state over the
//!   [`display::Surface`] trait (128x64 monochrome,
//!   `embedded-graphics` primitives)
//! - **Buttons**: 20 ms sampling of the joystick and shortcut keys with
//!   debounce and hold detection ([`buttons`])
//! - **Input logic**: pure selection and pagination arithmetic
//!   ([`input_logic`])

pub mod buttons;
pub mod display;
pub mod input_logic;
