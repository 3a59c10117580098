//! Strict streaming FASTQ reader.
//!
//! - Plain or gzip input, chosen by [`ReaderOptions::compression_type`].
//! - Pull-based: each record is exactly four lines, read on demand.
//! - Every structural violation is reported as a precise [`FormatError`];
//!   the first error ends iteration (no resynchronisation).
//! - The underlying source is released exactly once on every exit path.
//! - Optional `mmap` for plain files; `zlib` feature for the system zlib backend.
//! - Optional async API behind `async` feature.

pub mod error;
pub mod gzip;
pub mod lines;
pub mod parser;
pub mod policy;
pub mod reader;
pub mod record;
pub mod source;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::error::{FastqError, FormatError, IoContext};
pub use crate::gzip::GzipSource;
pub use crate::lines::LineSplitter;
pub use crate::parser::RecordParser;
pub use crate::policy::{CompressionType, ReaderOptions};
pub use crate::reader::{FastqReader, Records};
pub use crate::record::FastqRecord;
pub use crate::source::{ByteSource, Source};

#[cfg(feature = "async")]
pub use crate::async_reader::AsyncFastqReader;
