use crate::error::{FastqError, FormatError};
use crate::lines::LineSplitter;
use crate::record::FastqRecord;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Header,
    Sequence,
    Separator,
    Quality,
}

/// Builds records one line at a time, validating each line as it arrives.
///
/// Shared by the sync and async readers so both enforce the same rules.
#[derive(Debug)]
pub(crate) struct RecordAssembler {
    expect: Expect,
    id: String,
    description: String,
    sequence: Vec<u8>,
}

impl RecordAssembler {
    pub(crate) fn new() -> Self {
        Self {
            expect: Expect::Header,
            id: String::new(),
            description: String::new(),
            sequence: Vec::new(),
        }
    }

    /// Feeds the next line; returns a record once its quality line is in.
    pub(crate) fn push_line(&mut self, line: &[u8]) -> Result<Option<FastqRecord>, FormatError> {
        match self.expect {
            Expect::Header => {
                let (id, description) = parse_header(line)?;
                self.id = id;
                self.description = description;
                self.expect = Expect::Sequence;
                Ok(None)
            }
            Expect::Sequence => {
                self.sequence = line.to_vec();
                self.expect = Expect::Separator;
                Ok(None)
            }
            Expect::Separator => {
                // anything after '+' is ignored, including a repeated id
                if line.first() != Some(&b'+') {
                    return Err(FormatError::MalformedSeparator);
                }
                self.expect = Expect::Quality;
                Ok(None)
            }
            Expect::Quality => {
                if line.len() != self.sequence.len() {
                    return Err(FormatError::LengthMismatch {
                        seq: self.sequence.len(),
                        qual: line.len(),
                    });
                }
                self.expect = Expect::Header;
                Ok(Some(FastqRecord {
                    id: std::mem::take(&mut self.id),
                    description: std::mem::take(&mut self.description),
                    sequence: std::mem::take(&mut self.sequence),
                    quality: line.to_vec(),
                }))
            }
        }
    }

    /// Called at end of input: clean only on a record boundary.
    pub(crate) fn finish(&self) -> Result<(), FormatError> {
        let lines = match self.expect {
            Expect::Header => return Ok(()),
            Expect::Sequence => 1,
            Expect::Separator => 2,
            Expect::Quality => 3,
        };
        Err(FormatError::TruncatedRecord { lines })
    }
}

/// Splits `@<id>[<ws><description>]` on the first whitespace run.
fn parse_header(line: &[u8]) -> Result<(String, String), FormatError> {
    let rest = match line.split_first() {
        Some((b'@', rest)) => rest,
        _ => return Err(FormatError::MalformedHeader),
    };
    let text = std::str::from_utf8(rest)
        .map_err(|_| FormatError::MalformedHeader)?;
    let (id, description) = match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim_start()),
        None => (text, ""),
    };
    if id.is_empty() {
        return Err(FormatError::EmptyIdentifier);
    }
    Ok((id.to_string(), description.to_string()))
}

/// Pulls four lines per record from a [`LineSplitter`].
///
/// The first error ends the sequence; later calls return `Ok(None)`.
pub struct RecordParser<R> {
    lines: LineSplitter<R>,
    assembler: RecordAssembler,
    buf: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(rdr: R) -> Self {
        Self::from_lines(LineSplitter::new(rdr))
    }

    pub fn from_lines(lines: LineSplitter<R>) -> Self {
        Self {
            lines,
            assembler: RecordAssembler::new(),
            buf: Vec::with_capacity(256),
            failed: false,
        }
    }

    /// `Ok(None)` only when input ends exactly between records.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        if self.failed {
            return Ok(None);
        }
        let res = self.pull();
        self.failed = res.is_err();
        res
    }

    fn pull(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        loop {
            if !self.lines.read_line(&mut self.buf)? {
                return self
                    .assembler
                    .finish()
                    .map(|()| None)
                    .map_err(|e| FastqError::fmt_err(e, self.lines.position()));
            }
            match self.assembler.push_line(&self.buf) {
                Ok(Some(rec)) => return Ok(Some(rec)),
                Ok(None) => {}
                Err(e) => return Err(FastqError::fmt_err(e, self.lines.position())),
            }
        }
    }

    pub fn lines(&self) -> &LineSplitter<R> {
        &self.lines
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = Result<FastqRecord, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
