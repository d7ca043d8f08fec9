//! Built-in commands: status LEDs and terminal clear.
//!
//! LED handlers are objects over a shared [`LedBank`]; `clear` is a plain
//! function. All of them answer in a single chunk.

use core::cell::RefCell;
use core::fmt::Write;

use crate::cli_warn;
use crate::config::{CLEAR_SCREEN, RESET_CURSOR};
use crate::console::{Arity, CommandDescriptor, CommandHandler, Flow, Handler, Invocation};
use crate::log_globals::TASK_LOG_STREAM;

pub const TOGGLE_LED_HELP: &str = "toggleLed:\r\n toggles the blue led\r\n\r\n";
pub const TURN_ON_LED_HELP: &str =
    "turnOnLed <led-color>:\r\n turn on led <blue>, <red>, <orange> or <green>\r\n\r\n";
pub const TURN_OFF_LED_HELP: &str =
    "turnOffLed <led-color>:\r\n turn off led <blue>, <red>, <orange> or <green>\r\n\r\n";
pub const CLEAR_HELP: &str = "clear:\r\n clear the screen if terminal supports VT100\r\n\r\n";

/// Board status LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Led {
    Blue,
    Red,
    Orange,
    Green,
}

impl Led {
    pub const ALL: [Led; 4] = [Led::Blue, Led::Red, Led::Orange, Led::Green];

    /// Parse a color name as typed on the console (exact, lowercase).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|led| led.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Led::Blue => "blue",
            Led::Red => "red",
            Led::Orange => "orange",
            Led::Green => "green",
        }
    }
}

/// Hardware seam for the LED commands.
pub trait LedBank {
    type Error: core::fmt::Debug;

    fn set(&mut self, led: Led, on: bool) -> Result<(), Self::Error>;

    fn toggle(&mut self, led: Led) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedAction {
    /// Toggle the blue LED.
    Toggle,
    TurnOn,
    TurnOff,
}

/// One LED command bound to the shared bank.
pub struct LedCommand<'a, L: LedBank> {
    bank: &'a RefCell<L>,
    action: LedAction,
}

impl<'a, L: LedBank> LedCommand<'a, L> {
    pub fn new(bank: &'a RefCell<L>, action: LedAction) -> Self {
        Self { bank, action }
    }

    fn apply(&self, led: Led) -> bool {
        let Ok(mut bank) = self.bank.try_borrow_mut() else {
            return false;
        };
        let result = match self.action {
            LedAction::Toggle => bank.toggle(led),
            LedAction::TurnOn => bank.set(led, true),
            LedAction::TurnOff => bank.set(led, false),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                cli_warn!(TASK_LOG_STREAM, "{} LED: {:?}", led.name(), e);
                false
            }
        }
    }
}

impl<L: LedBank> CommandHandler for LedCommand<'_, L> {
    fn handle(&self, inv: &mut Invocation<'_, '_>) -> Flow {
        let led = match self.action {
            LedAction::Toggle => Led::Blue,
            LedAction::TurnOn | LedAction::TurnOff => {
                let name = inv.params().get(0).unwrap_or("");
                match Led::from_name(name) {
                    Some(led) => led,
                    None => {
                        let _ = write!(inv, "  unknown LED color '{}'\r\n\r\n", name);
                        return Flow::Done;
                    }
                }
            }
        };

        if !self.apply(led) {
            let _ = inv.write_str("  LED error\r\n\r\n");
            return Flow::Done;
        }

        let _ = match self.action {
            LedAction::Toggle => inv.write_str("  LED was toggled\r\n\r\n"),
            LedAction::TurnOn => write!(inv, "  {} LED was turned on\r\n\r\n", led.name()),
            LedAction::TurnOff => write!(inv, "  {} LED was turned off\r\n\r\n", led.name()),
        };
        Flow::Done
    }
}

/// Write the VT100 clear-screen and cursor-home sequences.
pub fn cmd_clear(inv: &mut Invocation<'_, '_>) -> Flow {
    let _ = write!(inv, "{} {}", CLEAR_SCREEN, RESET_CURSOR);
    Flow::Done
}

/// The board's command set over one LED bank.
///
/// # Example
///
/// ```ignore
/// let leds = RefCell::new(GpioLeds::new(...)?);
/// let builtins = BuiltinCommands::new(&leds);
/// let table = builtins.descriptors();
/// let registry = Registry::new(&table);
/// ```
pub struct BuiltinCommands<'a, L: LedBank> {
    toggle: LedCommand<'a, L>,
    turn_on: LedCommand<'a, L>,
    turn_off: LedCommand<'a, L>,
}

impl<'a, L: LedBank> BuiltinCommands<'a, L> {
    pub fn new(bank: &'a RefCell<L>) -> Self {
        Self {
            toggle: LedCommand::new(bank, LedAction::Toggle),
            turn_on: LedCommand::new(bank, LedAction::TurnOn),
            turn_off: LedCommand::new(bank, LedAction::TurnOff),
        }
    }

    /// Descriptors in `help` listing order.
    pub fn descriptors(&self) -> [CommandDescriptor<'_>; 4] {
        [
            CommandDescriptor {
                name: "toggleLed",
                help: TOGGLE_LED_HELP,
                handler: Handler::Object(&self.toggle),
                arity: Arity::Exactly(0),
            },
            CommandDescriptor {
                name: "turnOnLed",
                help: TURN_ON_LED_HELP,
                handler: Handler::Object(&self.turn_on),
                arity: Arity::Exactly(1),
            },
            CommandDescriptor {
                name: "turnOffLed",
                help: TURN_OFF_LED_HELP,
                handler: Handler::Object(&self.turn_off),
                arity: Arity::Exactly(1),
            },
            CommandDescriptor {
                name: "clear",
                help: CLEAR_HELP,
                handler: Handler::Function(cmd_clear),
                arity: Arity::Exactly(0),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_names_round_trip() {
        for led in Led::ALL {
            assert_eq!(Led::from_name(led.name()), Some(led));
        }
        assert_eq!(Led::from_name("Blue"), None);
        assert_eq!(Led::from_name("b"), None);
    }
}
