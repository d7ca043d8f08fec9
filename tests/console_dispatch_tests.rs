//! Dispatch loop tests with a recording sink

use core::cell::Cell;
use core::fmt::Write;

use rust_serial_cli::config::{CLEAR_SCREEN, LINE_SEPARATOR, RESET_CURSOR, WELCOME_BANNER};
use rust_serial_cli::console::{
    Arity, CliError, CommandDescriptor, CommandHandler, CommandProcessor, DispatchLoop, Flow,
    Handler, Invocation, LineBuffer, LineMailbox, LineReceiver, NoWake, Registry, Transmit, Wait,
};
use rust_serial_cli::CliStats;

#[derive(Default)]
struct RecordingSink {
    chunks: Vec<Vec<u8>>,
}

impl RecordingSink {
    fn text(&self, idx: usize) -> &str {
        core::str::from_utf8(&self.chunks[idx]).unwrap()
    }
}

impl Transmit for RecordingSink {
    type Error = ();

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.chunks.push(bytes.to_vec());
        Ok(())
    }
}

struct FailingSink;

impl Transmit for FailingSink {
    type Error = &'static str;

    fn transmit(&mut self, _bytes: &[u8]) -> Result<(), &'static str> {
        Err("timeout")
    }
}

/// Waiter that must never be reached.
struct NeverWait;

impl Wait for NeverWait {
    fn wait(&mut self) {
        panic!("line was already published");
    }
}

struct Pages {
    pages: usize,
    calls: Cell<usize>,
}

impl CommandHandler for Pages {
    fn handle(&self, inv: &mut Invocation<'_, '_>) -> Flow {
        self.calls.set(self.calls.get() + 1);
        let step = inv.step();
        let _ = write!(inv, "page {}", step);
        if step + 1 < self.pages {
            Flow::More
        } else {
            Flow::Done
        }
    }
}

fn silent(_inv: &mut Invocation<'_, '_>) -> Flow {
    Flow::Done
}

fn line(s: &str) -> LineBuffer {
    let mut buf = LineBuffer::new();
    buf.set(s);
    buf
}

#[test]
fn test_announce_sends_startup_sequence() {
    let mailbox: LineMailbox = LineMailbox::new();
    let (_producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&[]), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    let mut sink = RecordingSink::default();
    dispatch.announce(&mut sink);

    assert_eq!(sink.chunks.len(), 3);
    assert_eq!(sink.text(0), CLEAR_SCREEN);
    assert_eq!(sink.text(1), RESET_CURSOR);
    assert_eq!(sink.text(2), WELCOME_BANNER);
}

#[test]
fn test_poll_without_line_is_idle() {
    let mailbox: LineMailbox = LineMailbox::new();
    let (_producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&[]), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    let mut sink = RecordingSink::default();
    assert!(!dispatch.poll(&mut sink));
    assert!(!dispatch.poll(&mut sink));
    assert!(sink.chunks.is_empty());
    assert!(!dispatch.processor().is_continuing());
}

#[test]
fn test_separator_then_one_chunk_per_step() {
    let pages = Pages {
        pages: 3,
        calls: Cell::new(0),
    };
    let table = [CommandDescriptor {
        name: "pages",
        help: "",
        handler: Handler::Object(&pages),
        arity: Arity::Exactly(0),
    }];
    let mailbox: LineMailbox = LineMailbox::new();
    let (mut producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&table), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    assert!(producer.publish(&mut line("pages")));
    let mut sink = RecordingSink::default();
    dispatch.run_once(&mut NeverWait, &mut sink);

    assert_eq!(sink.chunks[0], LINE_SEPARATOR);
    assert_eq!(sink.text(1), "page 0");
    assert_eq!(sink.text(2), "page 1");
    assert_eq!(sink.text(3), "page 2");
    assert_eq!(sink.chunks.len(), 4);
    assert_eq!(pages.calls.get(), 3);
    assert!(!dispatch.processor().is_continuing());
    assert!(!mailbox.is_ready());
}

#[test]
fn test_empty_chunk_not_transmitted() {
    let table = [CommandDescriptor {
        name: "quiet",
        help: "",
        handler: Handler::Function(silent),
        arity: Arity::Any,
    }];
    let mailbox: LineMailbox = LineMailbox::new();
    let (mut producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&table), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    producer.publish(&mut line("quiet"));
    let mut sink = RecordingSink::default();
    assert!(dispatch.poll(&mut sink));
    assert_eq!(sink.chunks.len(), 1);
    assert_eq!(sink.chunks[0], LINE_SEPARATOR);
}

#[test]
fn test_unknown_line_answers_and_returns_idle() {
    let mailbox: LineMailbox = LineMailbox::new();
    let (mut producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&[]), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    let mut sink = RecordingSink::default();
    for _ in 0..2 {
        producer.publish(&mut line("bogus"));
        assert!(dispatch.poll(&mut sink));
    }
    assert_eq!(sink.chunks.len(), 4);
    assert_eq!(sink.text(1), CliError::NotRecognised.message());
    assert_eq!(sink.text(3), CliError::NotRecognised.message());
    assert_eq!(stats.snapshot().commands_rejected, 2);
}

#[test]
fn test_transmit_errors_are_counted_not_fatal() {
    let pages = Pages {
        pages: 2,
        calls: Cell::new(0),
    };
    let table = [CommandDescriptor {
        name: "pages",
        help: "",
        handler: Handler::Object(&pages),
        arity: Arity::Exactly(0),
    }];
    let mailbox: LineMailbox = LineMailbox::new();
    let (mut producer, consumer) = mailbox.split().unwrap();
    let stats = CliStats::new();
    let processor = CommandProcessor::new(Registry::new(&table), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    producer.publish(&mut line("pages"));
    assert!(dispatch.poll(&mut FailingSink));

    // Separator plus two chunks, all failed, handler still ran to the end
    assert_eq!(stats.snapshot().transmit_errors, 3);
    assert_eq!(pages.calls.get(), 2);
    assert!(!dispatch.processor().is_continuing());
}

#[test]
fn test_non_utf8_line_is_not_recognised() {
    let pages = Pages {
        pages: 1,
        calls: Cell::new(0),
    };
    let table = [CommandDescriptor {
        name: "toggleLed",
        help: "",
        handler: Handler::Object(&pages),
        arity: Arity::Exactly(0),
    }];
    static MAILBOX: LineMailbox = LineMailbox::new();
    let (producer, consumer) = MAILBOX.split().unwrap();
    let stats = CliStats::new();
    let mut receiver = LineReceiver::new(producer, NoWake, &stats);
    let processor = CommandProcessor::new(Registry::new(&table), &stats);
    let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &stats);

    for &b in b"toggleLed\xff extra\n" {
        receiver.on_byte(b);
    }
    let mut sink = RecordingSink::default();
    assert!(dispatch.poll(&mut sink));

    assert_eq!(pages.calls.get(), 0);
    assert_eq!(sink.chunks.len(), 2);
    assert_eq!(sink.text(1), CliError::NotRecognised.message());
    assert_eq!(stats.snapshot().commands_rejected, 1);
    assert_eq!(stats.snapshot().commands_dispatched, 0);
}
