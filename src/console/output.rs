//! Bounded output chunk

use core::fmt;

use heapless::String;

use crate::config::OUTPUT_CAPACITY;

/// One chunk of command output, at most `O` bytes.
///
/// Writes past the capacity are cut at the last whole character that fits,
/// never rejected, so a handler's `write!` cannot fail on length.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer<const O: usize = OUTPUT_CAPACITY> {
    text: String<O>,
}

impl<const O: usize> OutputBuffer<O> {
    pub const fn new() -> Self {
        Self { text: String::new() }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl<const O: usize> fmt::Write for OutputBuffer<O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.text.push_str(s).is_ok() {
            return Ok(());
        }
        for c in s.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_write_within_capacity() {
        let mut out = OutputBuffer::<16>::new();
        write!(out, "  {} LED", "red").unwrap();

        assert_eq!(out.as_str(), "  red LED");
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_write_truncates_at_capacity() {
        let mut out = OutputBuffer::<8>::new();
        out.write_str("0123456789").unwrap();
        out.write_str("more").unwrap();

        assert_eq!(out.as_str(), "01234567");
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_clear_resets_length() {
        let mut out = OutputBuffer::<8>::new();
        out.write_str("abc").unwrap();
        out.clear();

        assert!(out.is_empty());
    }
}
