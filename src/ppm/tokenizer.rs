//! Byte-level primitives for the plain-text PPM header.
//!
//! The header grammar allows whitespace runs and `#` line comments to
//! interleave freely between tokens, so every primitive here consumes as
//! much as it can and pushes back exactly one byte of lookahead.

use std::io::{self, Read};

use crate::error::PpmError;

/// Forward-only reader with a single byte of pushback.
///
/// Reads are unbuffered; wrap slow sources in [`std::io::BufReader`].
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    pushback: Option<u8>,
    consumed: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
            consumed: 0,
        }
    }

    /// Number of bytes consumed so far (pushed-back bytes excluded).
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Next byte, or `None` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>, PpmError> {
        if let Some(b) = self.pushback.take() {
            self.consumed += 1;
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.consumed += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Return `byte` to the stream. Only one byte of pushback is held.
    pub fn unread(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "double pushback");
        self.pushback = Some(byte);
        self.consumed -= 1;
    }

    /// Fill as much of `buf` as the stream allows. Returns the number of
    /// bytes written, which is short only at end of stream.
    pub fn read_fill(&mut self, buf: &mut [u8]) -> Result<usize, PpmError> {
        let mut filled = 0;
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(b) = self.pushback.take() {
            buf[0] = b;
            filled = 1;
        }
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.consumed += filled as u64;
                    return Err(e.into());
                }
            }
        }
        self.consumed += filled as u64;
        Ok(filled)
    }

    /// Unwrap the reader. A pushed-back byte, if any, is dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[inline]
pub(crate) fn is_ppm_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Consume a run of space/tab/CR/LF. True if at least one byte was consumed.
pub fn skip_whitespace<R: Read>(cursor: &mut ByteCursor<R>) -> Result<bool, PpmError> {
    let mut skipped = false;
    while let Some(b) = cursor.next_byte()? {
        if !is_ppm_whitespace(b) {
            cursor.unread(b);
            break;
        }
        skipped = true;
    }
    Ok(skipped)
}

/// Consume a `#` comment through its terminating `\n`.
///
/// End of stream inside a comment ends the comment.
pub fn skip_comment<R: Read>(cursor: &mut ByteCursor<R>) -> Result<bool, PpmError> {
    match cursor.next_byte()? {
        Some(b'#') => {}
        Some(b) => {
            cursor.unread(b);
            return Ok(false);
        }
        None => return Ok(false),
    }
    while let Some(b) = cursor.next_byte()? {
        if b == b'\n' {
            break;
        }
    }
    Ok(true)
}

/// Skip any interleaving of whitespace runs and comments.
pub fn skip_separators<R: Read>(cursor: &mut ByteCursor<R>) -> Result<(), PpmError> {
    while skip_whitespace(cursor)? || skip_comment(cursor)? {}
    Ok(())
}

/// Parse a run of ASCII digits.
///
/// Returns `None` without consuming anything when the next byte is not a
/// digit. Values past `u32::MAX` saturate; the remaining digits are still
/// consumed.
pub fn read_uint<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Option<u32>, PpmError> {
    let mut value: u32 = 0;
    let mut any = false;
    while let Some(b) = cursor.next_byte()? {
        if !b.is_ascii_digit() {
            cursor.unread(b);
            break;
        }
        any = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(b - b'0'));
    }
    Ok(any.then_some(value))
}
