//! UART HAL: outbound sink and the receive loop.
//!
//! The receive loop is the CLI's receive context: it runs at a higher
//! priority than the dispatch task, pulls one byte at a time from the UART
//! driver and never does anything slower than a mailbox publish.

use esp_idf_svc::hal::delay::{TickType, BLOCK};
use esp_idf_svc::hal::uart::{UartRxDriver, UartTxDriver};
use esp_idf_svc::sys::EspError;

use crate::console::{Feed, LineReceiver, Transmit, Wake};
use crate::log_globals::RX_LOG_STREAM;
use crate::{cli_error, cli_warn};

/// Blocking UART transmitter with a completion timeout.
pub struct UartSink<'d> {
    tx: UartTxDriver<'d>,
    timeout_ms: u32,
}

impl<'d> UartSink<'d> {
    pub fn new(tx: UartTxDriver<'d>, timeout_ms: u32) -> Self {
        Self { tx, timeout_ms }
    }
}

impl Transmit for UartSink<'_> {
    type Error = EspError;

    fn transmit(&mut self, mut bytes: &[u8]) -> Result<(), EspError> {
        while !bytes.is_empty() {
            let written = self.tx.write(bytes)?;
            bytes = &bytes[written..];
        }
        self.tx.wait_done(TickType::new_millis(self.timeout_ms as u64).ticks())
    }
}

/// Feed received bytes to the line receiver forever.
pub fn receive_loop<W: Wake>(rx: &mut UartRxDriver<'_>, receiver: &mut LineReceiver<'_, W>) -> ! {
    let mut byte = [0u8; 1];
    let mut overflowed = false;

    loop {
        match rx.read(&mut byte, BLOCK) {
            Ok(1) => match receiver.on_byte(byte[0]) {
                Feed::Overflow if !overflowed => {
                    overflowed = true;
                    cli_warn!(RX_LOG_STREAM, "line full, dropping input until newline");
                }
                Feed::LineDropped => {
                    overflowed = false;
                    cli_warn!(RX_LOG_STREAM, "previous line still pending, new line dropped");
                }
                Feed::Complete => overflowed = false,
                _ => {}
            },
            Ok(_) => {}
            Err(e) => {
                cli_error!(RX_LOG_STREAM, "uart read: {}", e);
            }
        }
    }
}
