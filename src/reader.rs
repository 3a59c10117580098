use crate::error::{FastqError, IoContext};
use crate::parser::RecordParser;
use crate::policy::{CompressionType, ReaderOptions};
use crate::record::FastqRecord;
use crate::source::{ByteSource, Source};
use crate::util::{file_is_gzip, has_gz_extension, open_file, starts_with_gzip_magic};

use std::io::{BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

const BUF_CAPACITY: usize = 256 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Exhausted,
    Poisoned,
    Closed,
}

/// Sync FASTQ reader (plain/.gz), streaming.
///
/// Records are pulled four lines at a time. The underlying source is released
/// exactly once: on natural end of input, on the first error, on [`close`],
/// or on drop, whichever comes first.
///
/// [`close`]: FastqReader::close
pub struct FastqReader {
    src: Source,
    parser: Option<RecordParser<BufReader<ByteSource>>>,
    opts: ReaderOptions,
    state: State,
    last_pos: IoContext,
}

impl FastqReader {
    /// Open a file. Gzip is applied according to `opts.compression_type`;
    /// `Auto` checks the `.gz` extension and then the magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let f = open_file(path)?;

        let is_gz = match opts.compression_type {
            CompressionType::None => false,
            CompressionType::Gzip => true,
            CompressionType::Auto => has_gz_extension(path) || file_is_gzip(&f, path)?,
        };

        let bytes = if is_gz {
            ByteSource::gzip(f)
        } else {
            #[cfg(feature = "mmap")]
            {
                // SAFETY: read-only map owned by the reader; the file must not be
                // truncated by another process while it is being read.
                let mmap = unsafe { memmap2::Mmap::map(&f) }
                    .map_err(|e| FastqError::open_err(path, e))?;
                ByteSource::Mapped(std::io::Cursor::new(mmap))
            }
            #[cfg(not(feature = "mmap"))]
            {
                ByteSource::plain(f)
            }
        };

        Ok(Self::with_source(Source::Path(path.to_path_buf()), bytes, opts))
    }

    /// Wrap an arbitrary byte stream (stdin, sockets, in-memory buffers).
    ///
    /// With `CompressionType::Auto` the head of the stream is peeked for the
    /// gzip magic; no record is read.
    pub fn from_reader<R: Read + Send + 'static>(
        reader: R,
        opts: ReaderOptions,
    ) -> Result<Self, FastqError> {
        let bytes = match opts.compression_type {
            CompressionType::None => ByteSource::plain(reader),
            CompressionType::Gzip => ByteSource::gzip(reader),
            CompressionType::Auto => {
                let mut rdr = BufReader::new(reader);
                let is_gz = starts_with_gzip_magic(&mut rdr)
                    .map_err(|e| FastqError::io_err(e, IoContext::default()))?;
                if is_gz {
                    ByteSource::gzip(rdr)
                } else {
                    ByteSource::plain(rdr)
                }
            }
        };
        Ok(Self::with_source(Source::Reader, bytes, opts))
    }

    fn with_source(src: Source, bytes: ByteSource, opts: ReaderOptions) -> Self {
        log::debug!(
            "opened {src} (compression: {:?}, gzip filter: {})",
            opts.compression_type,
            bytes.is_compressed()
        );
        let rdr = BufReader::with_capacity(BUF_CAPACITY, bytes);
        Self {
            src,
            parser: Some(RecordParser::new(rdr)),
            opts,
            state: State::Open,
            last_pos: IoContext::default(),
        }
    }

    /// Pull the next record. `Ok(None)` once input ends on a record boundary,
    /// after an error, or after `close`.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        let Some(parser) = self.parser.as_mut() else {
            return Ok(None);
        };
        match parser.next_record() {
            Ok(Some(rec)) => {
                log::trace!("{}: record {} ({} bp)", self.src, rec.id, rec.len());
                Ok(Some(rec))
            }
            Ok(None) => {
                self.release(State::Exhausted);
                Ok(None)
            }
            Err(err) => {
                log::debug!("{}: reader poisoned: {err}", self.src);
                self.release(State::Poisoned);
                Err(err)
            }
        }
    }

    /// Borrowing iterator over the remaining records.
    pub fn records(&mut self) -> Records<'_> {
        Records { reader: self }
    }

    /// Release the source. Safe to call repeatedly, after an error, or after
    /// the records ran out.
    pub fn close(&mut self) {
        if self.parser.is_some() {
            self.release(State::Closed);
        }
    }

    fn release(&mut self, state: State) {
        if let Some(parser) = self.parser.take() {
            self.last_pos = parser.lines().position();
            drop(parser);
            let line = self.last_pos.line_num;
            log::debug!("{}: source released at line {line}", self.src);
        }
        self.state = state;
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.opts
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Lines and bytes consumed from the (decompressed) stream.
    pub fn position(&self) -> IoContext {
        match &self.parser {
            Some(p) => p.lines().position(),
            None => self.last_pos,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.parser.is_none()
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl FusedIterator for FastqReader {}

impl Drop for FastqReader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Iterator returned by [`FastqReader::records`].
pub struct Records<'a> {
    reader: &'a mut FastqReader,
}

impl Iterator for Records<'_> {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

impl FusedIterator for Records<'_> {}
