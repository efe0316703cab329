//! Forward-only byte cursor with one byte of pushback.
//!
//! [`ByteSource`] owns a buffered async reader and offers the handful of
//! primitives the title parser is built from. None of them keep more than
//! the bytes they return: skipping works chunk by chunk on the reader's own
//! buffer, so an arbitrarily large document costs one buffer of memory.

use std::io;

use memchr::memchr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::constants::SPACE;

/// Outcome of a scanner primitive.
///
/// Running out of input is an expected result, not an `io::Error`: most
/// documents simply never contain what the parser is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned<T> {
    Value(T),
    EndOfInput,
}

impl<T> Scanned<T> {
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

pub struct ByteSource<R> {
    reader: R,
    pushback: Option<u8>,
    last: Option<u8>,
    consumed: u64,
}

impl<R: AsyncBufRead + Unpin> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: None,
            last: None,
            consumed: 0,
        }
    }

    /// Number of bytes consumed so far, net of pushback.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Look at the next byte without consuming it.
    pub async fn peek(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushback {
            return Ok(Some(b));
        }
        Ok(self.reader.fill_buf().await?.first().copied())
    }

    pub async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.take_pushback() {
            return Ok(Some(b));
        }
        let b = match self.reader.fill_buf().await?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.advance(1, Some(b));
        Ok(Some(b))
    }

    /// Push the most recently read byte back onto the source.
    ///
    /// Only one byte can be pending; unreading twice in a row is an error.
    pub fn unread_byte(&mut self) -> io::Result<()> {
        match (self.pushback, self.last.take()) {
            (None, Some(b)) => {
                self.pushback = Some(b);
                self.consumed -= 1;
                Ok(())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no byte available to unread",
            )),
        }
    }

    /// Consume bytes up to and including the next `target`.
    pub async fn skip_until(&mut self, target: u8) -> io::Result<Scanned<()>> {
        if let Some(b) = self.take_pushback()
            && b == target
        {
            return Ok(Scanned::Value(()));
        }
        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(Scanned::EndOfInput);
            }
            match memchr(target, buf) {
                Some(i) => {
                    self.advance(i + 1, Some(target));
                    return Ok(Scanned::Value(()));
                }
                None => {
                    let (n, last) = (buf.len(), buf.last().copied());
                    self.advance(n, last);
                }
            }
        }
    }

    /// Consume ASCII spaces (0x20 only) and stop in front of the first other byte.
    pub async fn skip_spaces(&mut self) -> io::Result<Scanned<()>> {
        loop {
            match self.read_byte().await? {
                None => return Ok(Scanned::EndOfInput),
                Some(SPACE) => continue,
                Some(_) => {
                    self.unread_byte()?;
                    return Ok(Scanned::Value(()));
                }
            }
        }
    }

    /// Read exactly `expected.len()` bytes and compare them, ASCII case-folded,
    /// with `expected`, which must already be lower-case.
    ///
    /// The bytes are consumed whether or not they match.
    pub async fn match_ascii_lowercase(&mut self, expected: &str) -> io::Result<Scanned<bool>> {
        let mut matched = true;
        for &want in expected.as_bytes() {
            match self.read_byte().await? {
                None => return Ok(Scanned::EndOfInput),
                Some(got) => matched &= got.to_ascii_lowercase() == want,
            }
        }
        Ok(Scanned::Value(matched))
    }

    /// Collect bytes up to the next `target`, which is consumed but not returned.
    pub async fn read_until(&mut self, target: u8) -> io::Result<Scanned<Vec<u8>>> {
        let mut out = Vec::new();
        if let Some(b) = self.take_pushback() {
            if b == target {
                return Ok(Scanned::Value(out));
            }
            out.push(b);
        }
        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(Scanned::EndOfInput);
            }
            match memchr(target, buf) {
                Some(i) => {
                    out.extend_from_slice(&buf[..i]);
                    self.advance(i + 1, Some(target));
                    return Ok(Scanned::Value(out));
                }
                None => {
                    out.extend_from_slice(buf);
                    let (n, last) = (buf.len(), buf.last().copied());
                    self.advance(n, last);
                }
            }
        }
    }

    fn take_pushback(&mut self) -> Option<u8> {
        let b = self.pushback.take()?;
        self.last = Some(b);
        self.consumed += 1;
        Some(b)
    }

    fn advance(&mut self, n: usize, last: Option<u8>) {
        self.reader.consume(n);
        self.last = last;
        self.consumed += n as u64;
    }
}
