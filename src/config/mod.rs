//! Module: config
//!
//! Purpose: Build-time capacities and runtime board settings for the CLI.
//!
//! Architecture:
//! - Capacities are const so every buffer is sized at compile time
//! - Board settings are plain structs with `Default`, overridden in `main`
//! - Terminal byte payloads live here so the startup path stays opaque
//!
//! Safety: RT-safe. Nothing here allocates or locks.

/// Capacity of one assembled input line, in bytes.
pub const LINE_CAPACITY: usize = 100;

/// Capacity of one output chunk, in bytes.
pub const OUTPUT_CAPACITY: usize = 100;

/// Log ring size (entries). Must be a power of 2.
pub const LOG_BUFFER_SIZE: usize = 64;

/// Separator transmitted after a line is received, before the response.
pub const LINE_SEPARATOR: &[u8] = b"\r\n";

/// VT100: clear the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// VT100: move the cursor to the upper left corner.
pub const RESET_CURSOR: &str = "\x1b[H";

/// Banner transmitted once at startup.
pub const WELCOME_BANNER: &str = "\
**************************************************************\r\n\
* BS IOT Command Line Interface.                             *\r\n\
* Type Help to view a list of registered commands.           *\r\n\
**************************************************************\r\n\r\n";

/// CLI UART and task settings.
///
/// Pins are fixed by the board wiring in `main`.
#[derive(Clone, Copy, Debug)]
pub struct CliConfig {
    pub baud_rate: u32,
    /// Upper bound for one blocking transmit.
    pub tx_timeout_ms: u32,
    /// Stack of the receive task, in bytes.
    pub rx_stack_size: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_timeout_ms: 500,
            rx_stack_size: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_crlf_terminated() {
        assert!(WELCOME_BANNER.ends_with("\r\n\r\n"));
        assert!(WELCOME_BANNER.contains("Type Help"));
    }

    #[test]
    fn test_log_buffer_is_power_of_two() {
        assert!(LOG_BUFFER_SIZE.is_power_of_two());
    }
}
