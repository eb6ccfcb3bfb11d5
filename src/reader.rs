//! Line source with a one-line push-back buffer.
//!
//! The decoder reads speculatively: it takes a line, tries to match it, and
//! hands it back with [`LineReader::unread`] when it belongs to someone else.
//! That is the only backtracking primitive the format needs; at most one line
//! is ever buffered.
//!
//! ```rust
//! use serde_tesql::LineReader;
//!
//! let mut reader = LineReader::new("a: 1\nb: 2\n".as_bytes());
//! let first = reader.next_line().unwrap().unwrap();
//! assert_eq!(first, "a: 1");
//!
//! reader.unread(first);
//! assert_eq!(reader.next_line().unwrap().as_deref(), Some("a: 1"));
//! assert_eq!(reader.next_line().unwrap().as_deref(), Some("b: 2"));
//! assert_eq!(reader.next_line().unwrap(), None);
//! ```

use crate::Result;
use std::io::BufRead;

/// Reads newline-terminated lines and allows pushing the last one back.
pub struct LineReader<R> {
    inner: R,
    pushed_back: Option<String>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            pushed_back: None,
            line: 0,
        }
    }

    /// Returns the next line without its terminator, or `None` at end of stream.
    ///
    /// Both `\n` and `\r\n` terminators are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the underlying reader fails.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pushed_back.take() {
            self.line += 1;
            return Ok(Some(line));
        }

        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        self.line += 1;
        Ok(Some(buf))
    }

    /// Pushes `line` back so the next call to [`LineReader::next_line`] returns it.
    ///
    /// Only the most recently read line may be pushed back, and only once.
    pub fn unread(&mut self, line: String) {
        debug_assert!(self.pushed_back.is_none(), "only one line can be pushed back");
        tracing::trace!(line = self.line, text = %line, "unread");
        self.pushed_back = Some(line);
        self.line = self.line.saturating_sub(1);
    }

    /// 1-based number of the last line handed out (0 before the first read).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Returns `true` when a pushed back line is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pushed_back.is_some()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
