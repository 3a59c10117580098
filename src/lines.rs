use crate::error::{FastqError, IoContext};
use std::io::BufRead;

/// Drop a trailing `\n` or `\r\n`. A final line without `\n` also loses a
/// trailing `\r`, so CRLF files cut after the carriage return still parse.
#[inline]
pub(crate) fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
}

/// Lazy, single-pass line sequence over a buffered byte source.
///
/// Lines have no length limit. A final line without a terminator is still
/// yielded. Read errors are returned as-is and end the sequence.
pub struct LineSplitter<R> {
    rdr: R,
    line_num: u64,
    byte_pos: u64,
    done: bool,
}

impl<R: BufRead> LineSplitter<R> {
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            line_num: 0,
            byte_pos: 0,
            done: false,
        }
    }

    /// Reads the next line into `buf` (terminator stripped).
    /// Returns `Ok(false)` once the source is exhausted.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<bool, FastqError> {
        buf.clear();
        if self.done {
            return Ok(false);
        }
        let n = match self.rdr.read_until(b'\n', buf) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Err(FastqError::io_err(e, LineSplitter::position(self)));
            }
        };
        if n == 0 {
            self.done = true;
            return Ok(false);
        }
        self.line_num += 1;
        self.byte_pos += n as u64;
        strip_terminator(buf);
        Ok(true)
    }

    /// Lines consumed so far and the byte offset just past the last one.
    #[inline]
    pub fn position(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl<R: BufRead> Iterator for LineSplitter<R> {
    type Item = Result<Vec<u8>, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.read_line(&mut buf) {
            Ok(true) => Some(Ok(buf)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for LineSplitter<R> {}
