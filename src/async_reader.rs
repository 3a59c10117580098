#![cfg(feature = "async")]

use crate::error::{FastqError, IoContext};
use crate::gzip::AsyncGzipSource;
use crate::lines::strip_terminator;
use crate::parser::RecordAssembler;
use crate::policy::{CompressionType, ReaderOptions};
use crate::record::FastqRecord;
use crate::source::Source;
use crate::util::{GZIP_MAGIC, has_gz_extension};

use std::path::Path;
use tokio::fs::File;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

const BUF_CAPACITY: usize = 256 * 1024;

type BoxedRead = Box<dyn AsyncRead + Unpin + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Exhausted,
    Poisoned,
    Closed,
}

/// Async FASTQ reader (plain/.gz), streaming.
///
/// Same record rules and error taxonomy as [`FastqReader`](crate::FastqReader).
pub struct AsyncFastqReader {
    src: Source,
    rdr: Option<BufReader<BoxedRead>>,
    opts: ReaderOptions,
    assembler: RecordAssembler,
    buf: Vec<u8>,
    line_num: u64,
    byte_pos: u64,
    state: State,
}

impl AsyncFastqReader {
    /// Open async from path; gzip per `opts.compression_type`.
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        opts: ReaderOptions,
    ) -> Result<Self, FastqError> {
        let path = path.as_ref().to_path_buf();
        let mut f = File::open(&path)
            .await
            .map_err(|e| FastqError::open_err(&path, e))?;

        let is_gz = match opts.compression_type {
            CompressionType::None => false,
            CompressionType::Gzip => true,
            CompressionType::Auto => {
                has_gz_extension(&path) || looks_like_gzip_async(&mut f, &path).await?
            }
        };

        let inner: BoxedRead = if is_gz {
            Box::new(AsyncGzipSource::new(f))
        } else {
            Box::new(f)
        };
        Ok(Self::with_source(Source::Path(path), inner, is_gz, opts))
    }

    /// Wrap any `AsyncRead`. With `Auto`, the head of the stream is peeked
    /// for the gzip magic.
    pub async fn from_async_read<R>(reader: R, opts: ReaderOptions) -> Result<Self, FastqError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (inner, is_gz): (BoxedRead, bool) = match opts.compression_type {
            CompressionType::None => (Box::new(reader), false),
            CompressionType::Gzip => (Box::new(AsyncGzipSource::new(reader)), true),
            CompressionType::Auto => {
                let mut rdr = BufReader::new(reader);
                let head = rdr
                    .fill_buf()
                    .await
                    .map_err(|e| FastqError::io_err(e, IoContext::default()))?;
                if head.starts_with(&GZIP_MAGIC) {
                    (Box::new(AsyncGzipSource::new(rdr)), true)
                } else {
                    (Box::new(rdr), false)
                }
            }
        };
        Ok(Self::with_source(Source::Reader, inner, is_gz, opts))
    }

    fn with_source(src: Source, inner: BoxedRead, is_gz: bool, opts: ReaderOptions) -> Self {
        log::debug!(
            "opened {src} async (compression: {:?}, gzip filter: {is_gz})",
            opts.compression_type
        );
        Self {
            src,
            rdr: Some(BufReader::with_capacity(BUF_CAPACITY, inner)),
            opts,
            assembler: RecordAssembler::new(),
            buf: Vec::with_capacity(256),
            line_num: 0,
            byte_pos: 0,
            state: State::Open,
        }
    }

    /// Pull the next record; same contract as the sync reader.
    pub async fn next_record(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        if self.rdr.is_none() {
            return Ok(None);
        }
        let res = self.pull().await;
        match &res {
            Ok(Some(rec)) => log::trace!("{}: record {} ({} bp)", self.src, rec.id, rec.len()),
            Ok(None) => self.release(State::Exhausted),
            Err(err) => {
                log::debug!("{}: reader poisoned: {err}", self.src);
                self.release(State::Poisoned);
            }
        }
        res
    }

    async fn pull(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        loop {
            if !self.read_line().await? {
                return self
                    .assembler
                    .finish()
                    .map(|()| None)
                    .map_err(|e| FastqError::fmt_err(e, self.ctx()));
            }
            match self.assembler.push_line(&self.buf) {
                Ok(Some(rec)) => return Ok(Some(rec)),
                Ok(None) => {}
                Err(e) => return Err(FastqError::fmt_err(e, self.ctx())),
            }
        }
    }

    async fn read_line(&mut self) -> Result<bool, FastqError> {
        let ctx = self.ctx();
        self.buf.clear();
        let Some(rdr) = self.rdr.as_mut() else {
            return Ok(false);
        };
        let n = rdr
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| FastqError::io_err(e, ctx))?;
        if n == 0 {
            return Ok(false);
        }
        self.line_num += 1;
        self.byte_pos += n as u64;
        strip_terminator(&mut self.buf);
        Ok(true)
    }

    /// Release the source; idempotent.
    pub fn close(&mut self) {
        if self.rdr.is_some() {
            self.release(State::Closed);
        }
    }

    fn release(&mut self, state: State) {
        if self.rdr.take().is_some() {
            log::debug!("{}: source released at line {}", self.src, self.line_num);
        }
        self.state = state;
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.opts
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    pub fn position(&self) -> IoContext {
        self.ctx()
    }

    pub fn is_closed(&self) -> bool {
        self.rdr.is_none()
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

async fn looks_like_gzip_async(f: &mut File, path: &Path) -> Result<bool, FastqError> {
    let sniffed = peek_magic(f).await;
    sniffed.map_err(|e| FastqError::open_err(path, e))
}

async fn peek_magic(f: &mut File) -> io::Result<bool> {
    let pos = f.stream_position().await?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic).await?;
    f.seek(SeekFrom::Start(pos)).await?;
    Ok(n >= 2 && magic == GZIP_MAGIC)
}
