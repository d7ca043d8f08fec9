//! GPIO HAL for the status LEDs.

use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::sys::EspError;

use crate::commands::{Led, LedBank};

/// Four push-pull LED outputs, active high.
pub struct GpioLeds<'d> {
    blue: PinDriver<'d, AnyOutputPin, Output>,
    red: PinDriver<'d, AnyOutputPin, Output>,
    orange: PinDriver<'d, AnyOutputPin, Output>,
    green: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> GpioLeds<'d> {
    /// Configure the pins as outputs, all LEDs off.
    pub fn new(
        blue: AnyOutputPin,
        red: AnyOutputPin,
        orange: AnyOutputPin,
        green: AnyOutputPin,
    ) -> Result<Self, EspError> {
        let mut leds = Self {
            blue: PinDriver::output(blue)?,
            red: PinDriver::output(red)?,
            orange: PinDriver::output(orange)?,
            green: PinDriver::output(green)?,
        };
        for led in Led::ALL {
            leds.set(led, false)?;
        }
        Ok(leds)
    }

    fn pin(&mut self, led: Led) -> &mut PinDriver<'d, AnyOutputPin, Output> {
        match led {
            Led::Blue => &mut self.blue,
            Led::Red => &mut self.red,
            Led::Orange => &mut self.orange,
            Led::Green => &mut self.green,
        }
    }
}

impl LedBank for GpioLeds<'_> {
    type Error = EspError;

    fn set(&mut self, led: Led, on: bool) -> Result<(), EspError> {
        let pin = self.pin(led);
        if on {
            pin.set_high()
        } else {
            pin.set_low()
        }
    }

    fn toggle(&mut self, led: Led) -> Result<(), EspError> {
        self.pin(led).toggle()
    }
}
