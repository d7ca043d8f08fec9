//! Log output on a dedicated UART.
//!
//! Drains both context log streams and writes them to a TX-only UART,
//! separate from the CLI UART so log lines never interleave with command
//! output.
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::console::Transmit;
use crate::logging::{format_to_buffer, LogEntry, LogStream};

/// Size of one formatted log line.
const LINE_BUF_SIZE: usize = 160;

/// Dropped-entry report interval.
#[cfg(target_os = "espidf")]
const DROPPED_REPORT_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    /// Stack of the logger task, in bytes.
    pub stack_size: usize,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            stack_size: 4096,
        }
    }
}

/// Format log entry as `[timestamp_us] LEVEL: message\r\n`.
fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!("[{:10}] {}: {}\r\n", entry.timestamp_us, entry.level.as_str(), entry.message()),
    )
}

/// Write every pending entry of `streams` to `sink`, in stream order.
///
/// Returns `true` if anything was written.
pub fn drain_streams<T: Transmit, const N: usize>(streams: &[&LogStream<N>], sink: &mut T) -> bool {
    let mut buf = [0u8; LINE_BUF_SIZE];
    let mut work_done = false;

    for stream in streams {
        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut buf);
            let _ = sink.transmit(&buf[..len]);
            work_done = true;
        }
    }

    work_done
}

/// Report and reset dropped-entry counters, if any are non-zero.
pub fn report_dropped<T: Transmit, const N: usize>(rx: &LogStream<N>, task: &LogStream<N>, sink: &mut T) {
    let rx_dropped = rx.dropped();
    let task_dropped = task.dropped();
    if rx_dropped == 0 && task_dropped == 0 {
        return;
    }

    let mut msg: heapless::String<64> = heapless::String::new();
    let _ = write!(msg, "[WARN] Dropped: RX={}, TASK={}\r\n", rx_dropped, task_dropped);
    let _ = sink.transmit(msg.as_bytes());

    rx.reset_dropped();
    task.reset_dropped();
}

/// Initialize a TX-only UART for log output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl esp_idf_svc::hal::peripheral::Peripheral<P = impl esp_idf_svc::hal::uart::Uart> + 'd,
    tx_pin: impl esp_idf_svc::hal::peripheral::Peripheral<P = impl esp_idf_svc::hal::gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<esp_idf_svc::hal::uart::UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::uart::{config::Config, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;

    let uart_config = Config::default().baudrate(Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<AnyIOPin>::None, // CTS
        Option::<AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Logger task: drains both streams forever.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task<T: Transmit>(sink: &mut T) -> ! {
    use crate::log_globals::{RX_LOG_STREAM, TASK_LOG_STREAM};
    use crate::logging::timestamp_us;

    let mut last_dropped_report = 0i64;

    loop {
        // Receive context first, its entries are the most time sensitive
        let work_done = drain_streams(&[&RX_LOG_STREAM, &TASK_LOG_STREAM], sink);

        let now = timestamp_us();
        if now - last_dropped_report > DROPPED_REPORT_US {
            report_dropped(&RX_LOG_STREAM, &TASK_LOG_STREAM, sink);
            last_dropped_report = now;
        }

        if !work_done {
            // SAFETY: plain FreeRTOS delay from task context.
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    struct VecSink(Vec<u8>);

    impl Transmit for VecSink {
        type Error = ();

        fn transmit(&mut self, bytes: &[u8]) -> Result<(), ()> {
            self.0.extend_from_slice(bytes);
            Ok(())
        }
    }

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_us: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"Hello world");
                msg
            },
        };

        let mut buf = [0u8; LINE_BUF_SIZE];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("1234567"));
        assert!(formatted.contains("INFO: Hello world"));
        assert!(formatted.ends_with("\r\n"));
    }

    #[test]
    fn test_drain_streams_in_order() {
        let rx = LogStream::<8>::new();
        let task = LogStream::<8>::new();
        rx.push(1, LogLevel::Warn, b"line dropped");
        task.push(2, LogLevel::Error, b"transmit failed");

        let mut sink = VecSink(Vec::new());
        assert!(drain_streams(&[&rx, &task], &mut sink));
        assert!(!drain_streams(&[&rx, &task], &mut sink));

        let text = String::from_utf8(sink.0).unwrap();
        let warn = text.find("WARN: line dropped").unwrap();
        let error = text.find("ERROR: transmit failed").unwrap();
        assert!(warn < error);
    }

    #[test]
    fn test_report_dropped_resets_counters() {
        let rx = LogStream::<4>::new();
        let task = LogStream::<4>::new();
        let mut sink = VecSink(Vec::new());

        report_dropped(&rx, &task, &mut sink);
        assert!(sink.0.is_empty());

        for i in 0..6 {
            rx.push(i as i64, LogLevel::Debug, b"x");
        }
        report_dropped(&rx, &task, &mut sink);

        let text = String::from_utf8(sink.0).unwrap();
        assert!(text.contains("RX=2, TASK=0"));
        assert_eq!(rx.dropped(), 0);
    }
}
