//! Byte-at-a-time line assembly for the receive context.
//!
//! Pure logic, no hardware dependencies. Every call completes in bounded
//! time, never blocks and never allocates, so it is safe to run from the
//! UART receive path.

use super::line_buffer::LineBuffer;
use super::mailbox::{LineProducer, Wake};
use crate::config::LINE_CAPACITY;
use crate::stats::CliStats;

const NEWLINE: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const BACKSPACE: u8 = 0x08;
const NUL: u8 = 0x00;

/// What one input byte did to the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feed {
    /// `\r`, NUL, or backspace on an empty line.
    Ignored,
    /// Byte appended.
    Stored,
    /// Backspace removed the last byte.
    Erased,
    /// Line full, byte dropped.
    Overflow,
    /// `\n` received, line ready for handoff.
    Complete,
    /// `\n` received but the previous line was still pending; this line
    /// was discarded. Only reported by [`LineReceiver`].
    LineDropped,
}

/// Editing state machine for one line.
pub struct LineAssembler<const C: usize = LINE_CAPACITY> {
    line: LineBuffer<C>,
}

impl<const C: usize> LineAssembler<C> {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Apply one input byte.
    ///
    /// On [`Feed::Complete`] the line stays in place until the caller
    /// hands it off with [`line_mut`](Self::line_mut) or clears it.
    pub fn feed(&mut self, byte: u8) -> Feed {
        match byte {
            NEWLINE => Feed::Complete,
            CARRIAGE_RETURN | NUL => Feed::Ignored,
            BACKSPACE => {
                if self.line.backspace() {
                    Feed::Erased
                } else {
                    Feed::Ignored
                }
            }
            _ => {
                if self.line.push(byte) {
                    Feed::Stored
                } else {
                    Feed::Overflow
                }
            }
        }
    }

    /// The line assembled so far.
    pub fn line(&self) -> &LineBuffer<C> {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut LineBuffer<C> {
        &mut self.line
    }

    /// Discard the partial line.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}

impl<const C: usize> Default for LineAssembler<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive-context end of the CLI: assembler plus mailbox producer.
///
/// # Example
///
/// ```ignore
/// static MAILBOX: LineMailbox = LineMailbox::new();
/// static STATS: CliStats = CliStats::new();
///
/// let (producer, consumer) = MAILBOX.split().unwrap();
/// let mut receiver = LineReceiver::new(producer, waker, &STATS);
///
/// loop {
///     let byte = uart_read_byte();
///     receiver.on_byte(byte);
/// }
/// ```
pub struct LineReceiver<'a, W: Wake, const C: usize = LINE_CAPACITY> {
    assembler: LineAssembler<C>,
    producer: LineProducer<'a, C>,
    waker: W,
    stats: &'a CliStats,
}

impl<'a, W: Wake, const C: usize> LineReceiver<'a, W, C> {
    pub fn new(producer: LineProducer<'a, C>, waker: W, stats: &'a CliStats) -> Self {
        Self {
            assembler: LineAssembler::new(),
            producer,
            waker,
            stats,
        }
    }

    /// Deliver the next received byte.
    ///
    /// A completed line is moved into the mailbox and the consumer woken.
    /// If the previous line is still pending the new one is discarded and
    /// [`Feed::LineDropped`] is returned.
    pub fn on_byte(&mut self, byte: u8) -> Feed {
        match self.assembler.feed(byte) {
            Feed::Complete => {
                if self.producer.publish_and_wake(self.assembler.line_mut(), &self.waker) {
                    self.stats.record_line_completed();
                    Feed::Complete
                } else {
                    self.stats.record_line_dropped();
                    Feed::LineDropped
                }
            }
            Feed::Overflow => {
                self.stats.record_overflow();
                Feed::Overflow
            }
            other => other,
        }
    }

    /// The line assembled so far.
    pub fn line(&self) -> &LineBuffer<C> {
        self.assembler.line()
    }
}
