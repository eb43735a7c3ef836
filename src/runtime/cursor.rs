//! Seekable input cursors.

/// A seekable read position over fixed input text.
///
/// Offsets are opaque positions produced by [`InputCursor::tell`]; seeking
/// only ever targets an offset the same cursor reported earlier.
pub trait InputCursor {
    /// Read one character and advance past it. `None` at end of input.
    fn read(&mut self) -> Option<char>;

    /// The next character, without consuming it.
    fn peek(&self) -> Option<char>;

    fn tell(&self) -> usize;

    fn seek(&mut self, offset: usize);

    /// Offset one past the last character.
    fn end(&self) -> usize;

    fn is_exhausted(&self) -> bool {
        self.tell() >= self.end()
    }
}

/// Cursor over a borrowed string; offsets are byte offsets.
#[derive(Debug, Clone)]
pub struct StrCursor<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> StrCursor<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }

    /// The input not yet read.
    pub fn remaining(&self) -> &'t str {
        self.text.get(self.pos..).unwrap_or("")
    }
}

impl InputCursor for StrCursor<'_> {
    fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.text.len());
    }

    fn end(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_advances_and_peek_does_not() {
        let mut cursor = StrCursor::new("hé!");
        assert_eq!(cursor.peek(), Some('h'));
        assert_eq!(cursor.tell(), 0);
        assert_eq!(cursor.read(), Some('h'));
        assert_eq!(cursor.read(), Some('é'));
        assert_eq!(cursor.tell(), 3);
        assert_eq!(cursor.remaining(), "!");
    }

    #[test]
    fn reading_at_end_is_a_no_op() {
        let mut cursor = StrCursor::new("a");
        cursor.read();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.read(), None);
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.tell(), 1);
    }

    #[test]
    fn seek_returns_to_reported_offsets() {
        let mut cursor = StrCursor::new("abc");
        cursor.read();
        let mark = cursor.tell();
        cursor.read();
        cursor.read();
        cursor.seek(mark);
        assert_eq!(cursor.read(), Some('b'));
        cursor.seek(99);
        assert!(cursor.is_exhausted());
    }
}
