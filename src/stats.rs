//! Shared CLI counters.
//!
//! Written from both the receive context and the dispatch task, read by
//! diagnostics. Counters only grow; nothing here is ever reset at runtime.

use core::sync::atomic::{AtomicU32, Ordering};

/// Atomic counters for the line handoff and dispatch path.
///
/// # Usage
///
/// ```ignore
/// static STATS: CliStats = CliStats::new();
///
/// // In the receive context:
/// STATS.record_overflow();
///
/// // Anywhere:
/// let snap = STATS.snapshot();
/// ```
pub struct CliStats {
    /// Lines handed off to the dispatch task.
    lines_completed: AtomicU32,

    /// Lines discarded because the previous one was not taken yet.
    lines_dropped: AtomicU32,

    /// Input bytes discarded because the line was full.
    overflow_bytes: AtomicU32,

    /// Lines that resolved to a registered handler.
    commands_dispatched: AtomicU32,

    /// Lines answered with an error message.
    commands_rejected: AtomicU32,

    /// Output chunks the sink failed to transmit.
    transmit_errors: AtomicU32,
}

impl CliStats {
    pub const fn new() -> Self {
        Self {
            lines_completed: AtomicU32::new(0),
            lines_dropped: AtomicU32::new(0),
            overflow_bytes: AtomicU32::new(0),
            commands_dispatched: AtomicU32::new(0),
            commands_rejected: AtomicU32::new(0),
            transmit_errors: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn record_line_completed(&self) {
        self.lines_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_line_dropped(&self) {
        self.lines_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_overflow(&self) {
        self.overflow_bytes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dispatched(&self) {
        self.commands_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_transmit_error(&self) {
        self.transmit_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_completed: self.lines_completed.load(Ordering::Relaxed),
            lines_dropped: self.lines_dropped.load(Ordering::Relaxed),
            overflow_bytes: self.overflow_bytes.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            transmit_errors: self.transmit_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for CliStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub lines_completed: u32,
    pub lines_dropped: u32,
    pub overflow_bytes: u32,
    pub commands_dispatched: u32,
    pub commands_rejected: u32,
    pub transmit_errors: u32,
}
