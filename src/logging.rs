//! Non-blocking logging for both CLI execution contexts.
//!
//! ```text
//! receive context        LogStream            logger task
//! ───────────────        ─────────            ───────────
//!
//! cli_warn!() ─────────▶ [L0][L1][L2] ──────▶ log UART TX
//! no blocking             lock-free           blocking ok
//! ```
//!
//! The receive context must finish every byte in bounded time, so it never
//! writes to a UART itself. Entries are dropped when the ring is full.
//! Each context logs into its own stream (see `log_globals`).

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::LOG_BUFFER_SIZE;

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text, or a marker if a truncated write split a character.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring (single producer, single drain).
///
/// Each execution context owns its own stream, so a push never races
/// another push. The drain runs in the logger task at its own pace.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: One producer writes slots ahead of write_idx, one drain reads
// slots behind it. The Release store of write_idx publishes the slot.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry without blocking.
    ///
    /// Returns `false` if the ring was full and the message was dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: Single producer, the drain never reads at or past write_idx.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain the oldest entry, if any.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single drain, slot is behind write_idx.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Count of dropped messages since the last reset.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the buffer end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let to_write = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
#[inline]
pub fn timestamp_us() -> i64 {
    // SAFETY: esp_timer is started by the IDF before app_main.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Host builds have no boot clock.
#[cfg(not(target_os = "espidf"))]
#[inline]
pub fn timestamp_us() -> i64 {
    0
}

/// Log into a stream without blocking.
///
/// ```ignore
/// cli_log!(LogLevel::Warn, RX_LOG_STREAM, "line dropped ({} bytes)", len);
/// ```
#[macro_export]
macro_rules! cli_log {
    ($level:expr, $stream:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($crate::logging::timestamp_us(), $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! cli_error {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Error, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! cli_warn {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Warn, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! cli_info {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Info, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! cli_debug {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Debug, $stream, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Warn, b"line dropped"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message(), "line dropped");

        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_log_stream_full_drops() {
        let stream = LogStream::<4>::new();

        for i in 0..4 {
            assert!(stream.push(i, LogLevel::Info, b"x"));
        }
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));

        stream.reset_dropped();
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'a'; MAX_MSG_LEN + 20];

        stream.push(0, LogLevel::Debug, &long);
        let entry = stream.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_macro_formats_into_stream() {
        let stream = LogStream::<8>::new();
        cli_warn!(stream, "overflow: {} bytes", 3);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message(), "overflow: 3 bytes");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 123456));
        assert_eq!(&buf[..len], b"Hello 12");
    }

    #[test]
    fn test_producer_and_drain_threads() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<16>::new());
        let producer = {
            let stream = Arc::clone(&stream);
            thread::spawn(move || {
                let mut sent = 0;
                while sent < 100 {
                    let msg = format!("msg {}", sent);
                    if stream.push(sent as i64, LogLevel::Info, msg.as_bytes()) {
                        sent += 1;
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut expected = 0i64;
        while expected < 100 {
            if let Some(entry) = stream.drain() {
                assert_eq!(entry.timestamp_us, expected);
                assert_eq!(entry.message(), format!("msg {}", expected));
                expected += 1;
            } else {
                thread::yield_now();
            }
        }

        producer.join().unwrap();
        assert_eq!(stream.pending(), 0);
    }
}
