//! Gzip decompression filter.
//!
//! Errors coming out of the decoder are either failures of the wrapped byte
//! source or problems with the compressed data itself. The wrapped source is
//! read through [`UpstreamReader`], which tags its errors on the way in; on the
//! way out the tag is removed again and every untagged error is reported as a
//! corrupt stream.

use flate2::read::MultiGzDecoder;
use std::error::Error as StdError;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
struct Upstream(io::Error);

#[derive(Debug, Error)]
#[error("invalid gzip data: {0}")]
pub(crate) struct CorruptStream(Box<dyn StdError + Send + Sync>);

fn tag_upstream(e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::Interrupted {
        return e;
    }
    io::Error::new(e.kind(), Upstream(e))
}

fn classify(e: io::Error) -> io::Error {
    let kind = e.kind();
    if matches!(kind, io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) {
        return e;
    }
    match e.into_inner() {
        Some(inner) => match inner.downcast::<Upstream>() {
            Ok(up) => up.0,
            Err(other) => io::Error::new(kind, CorruptStream(other)),
        },
        None => {
            let inner = Box::new(io::Error::from(kind));
            io::Error::new(kind, CorruptStream(inner))
        }
    }
}

pub(crate) fn is_corrupt_stream(e: &io::Error) -> bool {
    e.get_ref().is_some_and(|inner| inner.is::<CorruptStream>())
}

struct UpstreamReader<R>(R);

impl<R: Read> Read for UpstreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf).map_err(tag_upstream)
    }
}

/// Decompressed view over a gzip byte source (multi-member aware).
///
/// Nothing is read at construction; a missing gzip header surfaces on the
/// first `read`.
pub struct GzipSource<R> {
    decoder: MultiGzDecoder<UpstreamReader<R>>,
}

impl<R: Read> GzipSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            decoder: MultiGzDecoder::new(UpstreamReader(inner)),
        }
    }
}

impl<R: Read> Read for GzipSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.decoder.read(buf).map_err(classify)
    }
}

#[cfg(feature = "async")]
pub use self::async_gzip::AsyncGzipSource;

#[cfg(feature = "async")]
mod async_gzip {
    use super::{UpstreamReader, classify, tag_upstream};
    use async_compression::tokio::bufread::GzipDecoder;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    impl<R: AsyncRead + Unpin> AsyncRead for UpstreamReader<R> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.0)
                .poll_read(cx, buf)
                .map_err(tag_upstream)
        }
    }

    /// Async counterpart of [`GzipSource`](super::GzipSource).
    pub struct AsyncGzipSource<R> {
        decoder: GzipDecoder<BufReader<UpstreamReader<R>>>,
    }

    impl<R: AsyncRead + Unpin> AsyncGzipSource<R> {
        pub fn new(inner: R) -> Self {
            let upstream = BufReader::with_capacity(256 * 1024, UpstreamReader(inner));
            let mut decoder = GzipDecoder::new(upstream);
            decoder.multiple_members(true);
            Self { decoder }
        }
    }

    impl<R: AsyncRead + Unpin> AsyncRead for AsyncGzipSource<R> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.decoder)
                .poll_read(cx, buf)
                .map_err(classify)
        }
    }
}
