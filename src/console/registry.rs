//! Command registry and handler calling convention

use core::fmt::{self, Write};

/// Declared parameter count of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many whitespace-separated parameters.
    Exactly(u8),
    /// Any number, the handler validates.
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n as usize,
            Arity::Any => true,
        }
    }
}

/// Whether a handler has more output for the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// This command interaction is complete.
    Done,
    /// Call again with the same line for the next chunk.
    More,
}

impl Flow {
    pub fn is_pending(self) -> bool {
        self == Flow::More
    }
}

/// Parameter text following the command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters<'a> {
    raw: &'a str,
}

impl<'a> Parameters<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw: raw.trim() }
    }

    /// Parameter text as typed, without surrounding whitespace.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn count(&self) -> usize {
        self.raw.split_whitespace().count()
    }

    /// Get parameter by index (0-based)
    pub fn get(&self, idx: usize) -> Option<&'a str> {
        self.raw.split_whitespace().nth(idx)
    }
}

/// One handler call: parameters in, output chunk out.
///
/// Writing goes through [`core::fmt::Write`]; text beyond the chunk
/// capacity is truncated.
pub struct Invocation<'p, 'o> {
    params: Parameters<'p>,
    out: &'o mut dyn Write,
    step: usize,
}

impl<'p, 'o> Invocation<'p, 'o> {
    pub fn new(params: Parameters<'p>, out: &'o mut dyn Write, step: usize) -> Self {
        Self { params, out, step }
    }

    pub fn params(&self) -> &Parameters<'p> {
        &self.params
    }

    /// 0 on the first call for a line, +1 on every `Flow::More` follow-up.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Write for Invocation<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }
}

/// Stateful command implementation.
///
/// Must be short and non-blocking: nothing can abort a running handler.
pub trait CommandHandler {
    fn handle(&self, inv: &mut Invocation<'_, '_>) -> Flow;
}

/// Plain handler function.
pub type HandlerFn = fn(&mut Invocation<'_, '_>) -> Flow;

/// Tagged handler variant stored in a descriptor.
#[derive(Clone, Copy)]
pub enum Handler<'a> {
    Function(HandlerFn),
    Object(&'a dyn CommandHandler),
}

impl Handler<'_> {
    pub fn call(&self, inv: &mut Invocation<'_, '_>) -> Flow {
        match self {
            Handler::Function(f) => f(inv),
            Handler::Object(obj) => obj.handle(inv),
        }
    }
}

impl fmt::Debug for Handler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Function(_) => f.write_str("Handler::Function"),
            Handler::Object(_) => f.write_str("Handler::Object"),
        }
    }
}

/// Command descriptor
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor<'a> {
    pub name: &'a str,
    /// Shown verbatim by `help`, including its line endings.
    pub help: &'a str,
    pub handler: Handler<'a>,
    pub arity: Arity,
}

/// Read-only command table.
///
/// Order only matters for the `help` listing. Lookup is a linear scan,
/// the table holds a handful of entries.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a> {
    commands: &'a [CommandDescriptor<'a>],
}

impl<'a> Registry<'a> {
    pub const fn new(commands: &'a [CommandDescriptor<'a>]) -> Self {
        Self { commands }
    }

    /// Find a command by exact, case-sensitive name.
    pub fn find(&self, name: &str) -> Option<(usize, &'a CommandDescriptor<'a>)> {
        self.commands.iter().enumerate().find(|(_, c)| c.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&'a CommandDescriptor<'a>> {
        self.commands.get(index)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
