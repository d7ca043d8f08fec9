//! Single-slot line handoff between the receive context and the CLI task.
//!
//! # Architecture
//!
//! ```text
//! receive context          LineMailbox            dispatch task
//! ───────────────          ───────────            ─────────────
//!
//! LineProducer::publish ──▶ [slot][ready] ──────▶ LineConsumer::take
//!   never blocks             one line max           blocks on Wait
//! ```
//!
//! # Rules
//!
//! - The producer writes the slot only while `ready` is clear
//! - The consumer reads the slot only while `ready` is set
//! - A line completed while `ready` is still set is dropped, never queued
//!   and never written over the pending one

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use super::line_buffer::LineBuffer;
use crate::config::LINE_CAPACITY;

/// Wakes the consumer after a publish. Called from the receive context.
pub trait Wake {
    fn wake(&self);
}

/// Suspends the consumer until woken.
///
/// Implementations must latch: a `wake()` that happens before `wait()` is
/// entered makes the next `wait()` return immediately.
pub trait Wait {
    fn wait(&mut self);
}

/// Waker for consumers that poll instead of waiting.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWake;

impl Wake for NoWake {
    #[inline]
    fn wake(&self) {}
}

/// Single-slot line mailbox.
///
/// # Safety
///
/// Uses `UnsafeCell` for the slot. Access is exclusive by phase:
/// - Producer touches the slot only after observing `ready == false`
/// - Consumer touches the slot only after observing `ready == true`
/// - `split()` hands out exactly one producer and one consumer
///
/// # Memory Ordering
///
/// - Both sides store `ready` with `Release` after touching the slot
/// - Both sides load `ready` with `Acquire` before touching the slot
pub struct LineMailbox<const C: usize = LINE_CAPACITY> {
    slot: UnsafeCell<LineBuffer<C>>,
    ready: AtomicBool,
    split: AtomicBool,
}

// SAFETY: Slot access is serialized by the ready flag (see type docs).
unsafe impl<const C: usize> Sync for LineMailbox<C> {}
unsafe impl<const C: usize> Send for LineMailbox<C> {}

impl<const C: usize> LineMailbox<C> {
    /// Create an empty mailbox, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: UnsafeCell::new(LineBuffer::new()),
            ready: AtomicBool::new(false),
            split: AtomicBool::new(false),
        }
    }

    /// Hand out the producer and consumer ends.
    ///
    /// Returns `None` on every call after the first.
    pub fn split(&self) -> Option<(LineProducer<'_, C>, LineConsumer<'_, C>)> {
        if self.split.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((LineProducer { mailbox: self }, LineConsumer { mailbox: self }))
    }

    /// True while a published line waits to be taken.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl<const C: usize> Default for LineMailbox<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive-context end of the mailbox.
pub struct LineProducer<'a, const C: usize = LINE_CAPACITY> {
    mailbox: &'a LineMailbox<C>,
}

impl<const C: usize> LineProducer<'_, C> {
    /// Move a completed line into the slot.
    ///
    /// On return `line` is always empty and ready for the next line.
    /// Returns `false` if the slot was still occupied; the new line is
    /// dropped in that case. Never blocks.
    pub fn publish(&mut self, line: &mut LineBuffer<C>) -> bool {
        if self.mailbox.ready.load(Ordering::Acquire) {
            line.clear();
            return false;
        }

        // SAFETY: ready is clear, so the consumer does not touch the slot.
        // The slot is empty (consumer leaves it so), so the swap hands the
        // caller an empty buffer back.
        unsafe {
            let slot = &mut *self.mailbox.slot.get();
            slot.clear();
            core::mem::swap(slot, line);
        }

        self.mailbox.ready.store(true, Ordering::Release);
        true
    }

    /// Publish, then wake the consumer if the line was accepted.
    pub fn publish_and_wake<W: Wake + ?Sized>(&mut self, line: &mut LineBuffer<C>, waker: &W) -> bool {
        let accepted = self.publish(line);
        if accepted {
            waker.wake();
        }
        accepted
    }
}

/// Task end of the mailbox.
pub struct LineConsumer<'a, const C: usize = LINE_CAPACITY> {
    mailbox: &'a LineMailbox<C>,
}

impl<const C: usize> LineConsumer<'_, C> {
    /// Take the pending line without waiting.
    ///
    /// Returns `None` when nothing is ready; no state changes in that case.
    pub fn try_take(&mut self) -> Option<LineBuffer<C>> {
        if !self.mailbox.ready.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: ready is set, so the producer does not touch the slot.
        let line = unsafe { core::mem::take(&mut *self.mailbox.slot.get()) };

        self.mailbox.ready.store(false, Ordering::Release);
        Some(line)
    }

    /// Take the next line, suspending on `waiter` until one is published.
    pub fn take<W: Wait + ?Sized>(&mut self, waiter: &mut W) -> LineBuffer<C> {
        loop {
            if let Some(line) = self.try_take() {
                return line;
            }
            waiter.wait();
        }
    }

    /// True while a published line waits to be taken.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.mailbox.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_only_once() {
        let mailbox = LineMailbox::<8>::new();

        assert!(mailbox.split().is_some());
        assert!(mailbox.split().is_none());
    }

    #[test]
    fn test_publish_moves_line() {
        let mailbox = LineMailbox::<8>::new();
        let (mut producer, mut consumer) = mailbox.split().unwrap();

        let mut line = LineBuffer::new();
        line.set("help");

        assert!(producer.publish(&mut line));
        assert!(line.is_empty());
        assert!(mailbox.is_ready());

        let taken = consumer.try_take().unwrap();
        assert_eq!(taken.to_str(), Some("help"));
        assert!(!mailbox.is_ready());
    }

    #[test]
    fn test_slot_left_empty_after_take() {
        let mailbox = LineMailbox::<8>::new();
        let (mut producer, mut consumer) = mailbox.split().unwrap();

        let mut line = LineBuffer::new();
        line.set("clear");
        producer.publish(&mut line);
        consumer.try_take();

        // SAFETY: test is single threaded and ready is clear.
        let slot = unsafe { &*mailbox.slot.get() };
        assert!(slot.is_empty());
    }
}
