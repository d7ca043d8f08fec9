//! Serial console: line handoff and command dispatch
//!
//! Receive context assembles bytes into lines and hands them to the CLI
//! task through a single-slot mailbox. Zero heap allocation.

pub mod assembler;
pub mod dispatch;
pub mod error;
pub mod line_buffer;
pub mod mailbox;
pub mod output;
pub mod processor;
pub mod registry;

pub use assembler::{Feed, LineAssembler, LineReceiver};
pub use dispatch::{DispatchLoop, Transmit};
pub use error::CliError;
pub use line_buffer::LineBuffer;
pub use mailbox::{LineConsumer, LineMailbox, LineProducer, NoWake, Wait, Wake};
pub use output::OutputBuffer;
pub use processor::{split_command, CommandProcessor, Resolution, HELP_NAME, HELP_TEXT};
pub use registry::{
    Arity, CommandDescriptor, CommandHandler, Flow, Handler, HandlerFn, Invocation, Parameters, Registry,
};
