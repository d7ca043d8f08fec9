//! Fixed-capacity input line

use heapless::Vec;

use crate::config::LINE_CAPACITY;

/// One input line, at most `C` bytes.
///
/// The length is tracked explicitly, so there is no terminator byte and no
/// stale content past the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineBuffer<const C: usize = LINE_CAPACITY> {
    buf: Vec<u8, C>,
}

impl<const C: usize> LineBuffer<C> {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append a byte. Returns `false` (byte dropped) when full.
    pub fn push(&mut self, byte: u8) -> bool {
        self.buf.push(byte).is_ok()
    }

    /// Erase the last byte. Returns `false` if the line was empty.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Replace the contents, truncating to capacity.
    pub fn set(&mut self, s: &str) {
        self.buf.clear();
        let bytes = s.as_bytes();
        let copy_len = bytes.len().min(C);
        // Cannot fail: copy_len <= C
        let _ = self.buf.extend_from_slice(&bytes[..copy_len]);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The whole line as text, or `None` if any byte is not valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.buf).ok()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }
}
