use crate::gzip::GzipSource;
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;

/// Where a reader's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Reader => f.write_str("<reader>"),
        }
    }
}

/// Sequential byte provider; the variant is picked once at open time.
/// Dropping it releases the underlying handle and any decoder state.
pub enum ByteSource {
    Plain(Box<dyn Read + Send>),
    Gzip(GzipSource<Box<dyn Read + Send>>),
    #[cfg(feature = "mmap")]
    Mapped(io::Cursor<memmap2::Mmap>),
}

impl ByteSource {
    pub fn plain<R: Read + Send + 'static>(inner: R) -> Self {
        ByteSource::Plain(Box::new(inner))
    }

    pub fn gzip<R: Read + Send + 'static>(inner: R) -> Self {
        ByteSource::Gzip(GzipSource::new(Box::new(inner)))
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, ByteSource::Gzip(_))
    }
}

impl Read for ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ByteSource::Plain(r) => r.read(buf),
            ByteSource::Gzip(r) => r.read(buf),
            #[cfg(feature = "mmap")]
            ByteSource::Mapped(r) => r.read(buf),
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ByteSource::Plain(_) => "Plain",
            ByteSource::Gzip(_) => "Gzip",
            #[cfg(feature = "mmap")]
            ByteSource::Mapped(_) => "Mapped",
        };
        f.debug_tuple("ByteSource").field(&kind).finish()
    }
}
