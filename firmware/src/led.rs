//! Activity LED.

use embassy_rp::gpio::Output;
use nrf_bridge_core::Indicator;

/// On-board LED driven as the bridge activity indicator.
///
/// Lit while a payload moves in either direction. With the `led-active-low`
/// feature the pin is driven low to light the LED.
pub struct LedIndicator<'d> {
    pin: Output<'d>,
}

impl<'d> LedIndicator<'d> {
    const ACTIVE_LOW: bool = cfg!(feature = "led-active-low");

    /// Wrap an output pin and switch the LED off.
    pub fn new(pin: Output<'d>) -> Self {
        let mut led = Self { pin };
        led.set_idle();
        led
    }

    fn drive(&mut self, lit: bool) {
        if lit != Self::ACTIVE_LOW {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

impl Indicator for LedIndicator<'_> {
    fn set_active(&mut self) {
        self.drive(true);
    }

    fn set_idle(&mut self) {
        self.drive(false);
    }
}
