//! Global log stream instances, one per execution context.

use crate::logging::LogStream;

/// Receive context log stream.
///
/// Single producer (UART receive loop feeding the line receiver),
/// single consumer (log UART drain).
pub static RX_LOG_STREAM: LogStream = LogStream::new();

/// Dispatch task log stream.
///
/// Single producer (dispatch loop and command handlers),
/// single consumer (log UART drain).
pub static TASK_LOG_STREAM: LogStream = LogStream::new();
