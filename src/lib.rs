//! # RustSerialCli
//!
//! Serial command line interface with a receive-context to task line
//! handoff.
//!
//! ## Architecture
//!
//! Bytes flow one way, through owned buffers:
//! - The receive context assembles a line and moves it into a single-slot
//!   mailbox, then wakes the CLI task
//! - The CLI task takes the line, resolves the command and transmits the
//!   response chunk by chunk
//! - The only shared state is the mailbox flag, counters and log rings,
//!   all atomic

#![cfg_attr(not(test), no_std)]

pub mod logging;
pub mod log_globals;
pub mod config;
pub mod stats;
pub mod console;
pub mod commands;
pub mod uart_logger;
#[cfg(target_os = "espidf")]
pub mod hal;

pub use log_globals::{RX_LOG_STREAM, TASK_LOG_STREAM};
pub use stats::{CliStats, StatsSnapshot};
pub use console::{CommandProcessor, DispatchLoop, LineMailbox, LineReceiver, Registry};
pub use commands::{BuiltinCommands, Led, LedBank};
