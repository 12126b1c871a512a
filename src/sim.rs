//! Desktop shell backend (`sim` feature).
//!
//! One SDL window plays both hardware roles: [`SimSurface`] renders into
//! it as the display panel, and [`SimPad`] turns its keyboard events into
//! pad samples. Arrow keys and Enter drive the joystick, 1/2/3 the
//! shortcut keys. The window handle is shared through `Rc<RefCell<_>>`,
//! which is why the binary runs both on a current-thread `LocalSet`.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::ui::buttons::{ButtonPad, Control, PadState};
use crate::ui::display::Surface;

/// Open the simulator window and split it into its two roles.
pub fn window() -> (SimSurface, SimPad) {
    let settings = OutputSettingsBuilder::new().scale(4).build();
    let window = Rc::new(RefCell::new(Window::new("hatctl", &settings)));
    let display = SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    (
        SimSurface {
            display,
            window: Rc::clone(&window),
            hidden: false,
        },
        SimPad {
            window,
            held: PadState::IDLE,
        },
    )
}

/// [`Surface`] over the simulator display. Hiding blanks the window (the
/// desktop stand-in for powering the panel down); contrast has no SDL
/// equivalent and is ignored.
pub struct SimSurface {
    display: SimulatorDisplay<BinaryColor>,
    window: Rc<RefCell<Window>>,
    hidden: bool,
}

impl DrawTarget for SimSurface {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl OriginDimensions for SimSurface {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl Surface for SimSurface {
    fn show(&mut self) {
        self.hidden = false;
    }

    fn hide(&mut self) {
        if self.hidden {
            return;
        }
        self.hidden = true;
        let _ = self.display.clear(BinaryColor::Off);
        self.window.borrow_mut().update(&self.display);
    }

    fn set_contrast(&mut self, _contrast: u8) {}

    fn flush(&mut self) {
        if !self.hidden {
            self.window.borrow_mut().update(&self.display);
        }
    }
}

/// [`ButtonPad`] fed by the window's keyboard events.
pub struct SimPad {
    window: Rc<RefCell<Window>>,
    held: PadState,
}

impl ButtonPad for SimPad {
    /// Pump pending SDL events into the held-key state and report it.
    /// Closing the window ends the process, mirroring a power cut.
    fn sample(&mut self) -> PadState {
        let mut window = self.window.borrow_mut();
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => std::process::exit(0),
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if let Some(control) = keycode_to_control(keycode) {
                        self.held = self.held.with(control, true);
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(control) = keycode_to_control(keycode) {
                        self.held = self.held.with(control, false);
                    }
                }
                _ => {}
            }
        }
        self.held
    }
}

fn keycode_to_control(keycode: Keycode) -> Option<Control> {
    match keycode {
        Keycode::Up => Some(Control::Up),
        Keycode::Down => Some(Control::Down),
        Keycode::Left => Some(Control::Left),
        Keycode::Right => Some(Control::Right),
        Keycode::Return | Keycode::Space => Some(Control::Press),
        Keycode::Num1 => Some(Control::Key1),
        Keycode::Num2 => Some(Control::Key2),
        Keycode::Num3 => Some(Control::Key3),
        _ => None,
    }
}
