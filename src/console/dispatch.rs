//! Command dispatch loop for the CLI task
//!
//! Idle: wait on the mailbox. Processing: feed the taken line to the
//! processor and transmit every chunk until it reports no more output
//! pending. Both phases live inside one `run_once` call, so the loop is
//! idle whenever a caller can observe it.

use super::line_buffer::LineBuffer;
use super::mailbox::{LineConsumer, Wait};
use super::output::OutputBuffer;
use super::processor::CommandProcessor;
use crate::config::{CLEAR_SCREEN, LINE_CAPACITY, LINE_SEPARATOR, OUTPUT_CAPACITY, RESET_CURSOR, WELCOME_BANNER};
use crate::log_globals::TASK_LOG_STREAM;
use crate::stats::CliStats;
use crate::{cli_debug, cli_error};

/// Outbound byte sink.
pub trait Transmit {
    type Error: core::fmt::Debug;

    /// Transmit all of `bytes`.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Consumer task state machine.
///
/// Owns the output buffer and the processor; the line is owned only for
/// the duration of one `Processing` phase.
pub struct DispatchLoop<'a, const C: usize = LINE_CAPACITY, const O: usize = OUTPUT_CAPACITY> {
    consumer: LineConsumer<'a, C>,
    processor: CommandProcessor<'a>,
    output: OutputBuffer<O>,
    stats: &'a CliStats,
}

impl<'a, const C: usize, const O: usize> DispatchLoop<'a, C, O> {
    pub fn new(consumer: LineConsumer<'a, C>, processor: CommandProcessor<'a>, stats: &'a CliStats) -> Self {
        Self {
            consumer,
            processor,
            output: OutputBuffer::new(),
            stats,
        }
    }

    pub fn processor(&self) -> &CommandProcessor<'a> {
        &self.processor
    }

    /// Startup sequence: clear screen, home cursor, welcome banner.
    pub fn announce<T: Transmit>(&mut self, sink: &mut T) {
        self.send(sink, CLEAR_SCREEN.as_bytes());
        self.send(sink, RESET_CURSOR.as_bytes());
        self.send(sink, WELCOME_BANNER.as_bytes());
    }

    /// Wait for one line and process it to completion.
    pub fn run_once<W: Wait + ?Sized, T: Transmit>(&mut self, waiter: &mut W, sink: &mut T) {
        let line = self.consumer.take(waiter);
        self.process_line(&line, sink);
    }

    /// Process a line if one is ready. Returns `false` if none was.
    pub fn poll<T: Transmit>(&mut self, sink: &mut T) -> bool {
        match self.consumer.try_take() {
            Some(line) => {
                self.process_line(&line, sink);
                true
            }
            None => false,
        }
    }

    /// Serve lines forever.
    pub fn run<W: Wait + ?Sized, T: Transmit>(&mut self, waiter: &mut W, sink: &mut T) -> ! {
        loop {
            self.run_once(waiter, sink);
        }
    }

    fn process_line<T: Transmit>(&mut self, line: &LineBuffer<C>, sink: &mut T) {
        cli_debug!(TASK_LOG_STREAM, "line: {} bytes", line.len());

        self.send(sink, LINE_SEPARATOR);

        loop {
            self.output.clear();
            let flow = self.processor.process_bytes(line.as_bytes(), &mut self.output);

            if !self.output.is_empty() {
                let result = sink.transmit(self.output.as_bytes());
                self.note_transmit(result);
            }

            if !flow.is_pending() {
                break;
            }
        }
    }

    fn send<T: Transmit>(&self, sink: &mut T, bytes: &[u8]) {
        let result = sink.transmit(bytes);
        self.note_transmit(result);
    }

    fn note_transmit<E: core::fmt::Debug>(&self, result: Result<(), E>) {
        if let Err(e) = result {
            self.stats.record_transmit_error();
            cli_error!(TASK_LOG_STREAM, "transmit failed: {:?}", e);
        }
    }
}
