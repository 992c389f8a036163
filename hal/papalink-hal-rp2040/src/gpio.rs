//! GPIO output pins
//!
//! Driver lines are left as inputs until the program configures them, so
//! they wrap [`Flex`] rather than [`embassy_rp::gpio::Output`].

use embassy_rp::gpio::{Flex, Pin};
use embassy_rp::Peri;
use papalink_hal::OutputPin;

/// Output pin that starts out unconfigured
pub struct FlexPin<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexPin<'d> {
    /// Wrap a GPIO; the pin stays an input until [`OutputPin::make_output`]
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self { pin: Flex::new(pin) }
    }
}

impl OutputPin for FlexPin<'_> {
    fn make_output(&mut self) {
        // Latch LOW first so the pin never glitches high
        self.pin.set_low();
        self.pin.set_as_output();
    }

    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
