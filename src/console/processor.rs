//! Command line processor
//!
//! Splits a line into command name and parameter text, resolves the name in
//! the registry, checks the parameter count and runs the handler. A handler
//! returning [`Flow::More`] is called again for the same line, with the
//! step incremented, until it returns [`Flow::Done`].

use core::fmt::Write;

use super::error::CliError;
use super::output::OutputBuffer;
use super::registry::{Arity, CommandDescriptor, Flow, Invocation, Parameters, Registry};
use crate::log_globals::TASK_LOG_STREAM;
use crate::stats::CliStats;
use crate::{cli_debug, cli_info};

/// Name of the implicit help command.
pub const HELP_NAME: &str = "help";

/// Help text of the implicit help command.
pub const HELP_TEXT: &str = "\r\nhelp:\r\n Lists all the registered commands\r\n\r\n";

/// Arity of the implicit help command.
pub const HELP_ARITY: Arity = Arity::Exactly(0);

/// Split a line into command name and the text after it.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], &line[end..]),
        None => (line, ""),
    }
}

/// Outcome of resolving a line against the registry.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Help,
    Command(usize, &'a CommandDescriptor<'a>),
    Rejected(CliError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Help,
    Command(usize),
}

/// Command in the middle of a multi-chunk response.
#[derive(Debug, Clone, Copy)]
struct Continuation {
    target: Target,
    step: usize,
}

/// Resolves lines and drives handlers, one output chunk per call.
pub struct CommandProcessor<'a> {
    registry: Registry<'a>,
    stats: &'a CliStats,
    active: Option<Continuation>,
}

impl<'a> CommandProcessor<'a> {
    pub fn new(registry: Registry<'a>, stats: &'a CliStats) -> Self {
        Self {
            registry,
            stats,
            active: None,
        }
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Decide what a line runs, without running it.
    pub fn resolve(&self, line: &str) -> Resolution<'a> {
        let (name, rest) = split_command(line);
        let count = Parameters::new(rest).count();

        if name == HELP_NAME {
            return if HELP_ARITY.accepts(count) {
                Resolution::Help
            } else {
                Resolution::Rejected(CliError::IncorrectParameters)
            };
        }

        match self.registry.find(name) {
            None => Resolution::Rejected(CliError::NotRecognised),
            Some((_, cmd)) if !cmd.arity.accepts(count) => {
                Resolution::Rejected(CliError::IncorrectParameters)
            }
            Some((index, cmd)) => Resolution::Command(index, cmd),
        }
    }

    /// Produce the next output chunk for `line` into `out`.
    ///
    /// `out` is appended to; callers clear it between chunks. While the
    /// previous call returned [`Flow::More`] the line is not re-parsed and
    /// the same handler continues.
    pub fn process<const O: usize>(&mut self, line: &str, out: &mut OutputBuffer<O>) -> Flow {
        let (target, step) = match self.active.take() {
            Some(cont) => (cont.target, cont.step),
            None => match self.resolve(line) {
                Resolution::Help => {
                    self.stats.record_dispatched();
                    (Target::Help, 0)
                }
                Resolution::Command(index, _) => {
                    self.stats.record_dispatched();
                    (Target::Command(index), 0)
                }
                Resolution::Rejected(err) => return self.reject(err, split_command(line).0, out),
            },
        };

        let flow = match target {
            Target::Help => self.help_chunk(step, out),
            Target::Command(index) => self.run_handler(index, line, step, out),
        };

        if flow.is_pending() {
            cli_debug!(TASK_LOG_STREAM, "continuation step {}", step + 1);
            self.active = Some(Continuation {
                target,
                step: step + 1,
            });
        }
        flow
    }

    /// Like [`process`](Self::process), for a raw received line.
    ///
    /// A line that is not valid UTF-8 names no command and is answered with
    /// [`CliError::NotRecognised`] as a whole; no part of it is dispatched.
    pub fn process_bytes<const O: usize>(&mut self, line: &[u8], out: &mut OutputBuffer<O>) -> Flow {
        match core::str::from_utf8(line) {
            Ok(text) => self.process(text, out),
            Err(_) => self.reject(CliError::NotRecognised, "<non-utf8>", out),
        }
    }

    /// True while a handler has more output pending.
    pub fn is_continuing(&self) -> bool {
        self.active.is_some()
    }

    /// Abandon a pending continuation.
    pub fn reset(&mut self) {
        self.active = None;
    }

    fn reject<const O: usize>(&self, err: CliError, name: &str, out: &mut OutputBuffer<O>) -> Flow {
        self.stats.record_rejected();
        cli_info!(TASK_LOG_STREAM, "{}: {}", err.code(), name);
        let _ = out.write_str(err.message());
        Flow::Done
    }

    fn run_handler<const O: usize>(
        &self,
        index: usize,
        line: &str,
        step: usize,
        out: &mut OutputBuffer<O>,
    ) -> Flow {
        let Some(cmd) = self.registry.get(index) else {
            return Flow::Done;
        };

        let params = Parameters::new(split_command(line).1);
        let mut inv = Invocation::new(params, out, step);
        cmd.handler.call(&mut inv)
    }

    /// Step 0 lists help itself, step k lists descriptor k-1.
    fn help_chunk<const O: usize>(&self, step: usize, out: &mut OutputBuffer<O>) -> Flow {
        let text = if step == 0 {
            HELP_TEXT
        } else {
            match self.registry.get(step - 1) {
                Some(cmd) => cmd.help,
                None => return Flow::Done,
            }
        };
        let _ = out.write_str(text);

        if step < self.registry.len() {
            Flow::More
        } else {
            Flow::Done
        }
    }
}
