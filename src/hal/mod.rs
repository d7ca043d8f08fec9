//! Hardware Abstraction Layer for the serial CLI.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Line handoff and dispatch logic stays in `console`, HAL is just I/O.

pub mod gpio;
pub mod notify;
pub mod uart;

pub use gpio::GpioLeds;
pub use notify::{TaskWaiter, TaskWaker};
pub use uart::{receive_loop, UartSink};
