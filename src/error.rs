use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Position in the (decompressed) stream at which an error was detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

/// Structural violations of the four-line FASTQ layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected header '@' at start of record")]
    MalformedHeader,
    #[error("header line has an empty identifier")]
    EmptyIdentifier,
    #[error("missing '+' separator line")]
    MalformedSeparator,
    #[error("quality length ({qual}) does not match sequence length ({seq})")]
    LengthMismatch { seq: usize, qual: usize },
    #[error("record truncated after {lines} of 4 lines")]
    TruncatedRecord { lines: usize },
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt gzip stream at {ctx:?}: {source}")]
    CorruptCompressionStream {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("format error at {ctx:?}: {source}")]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
}

impl FastqError {
    pub(crate) fn open_err(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Classifies a read failure: errors raised by the gzip filter become
    /// `CorruptCompressionStream`, everything else is an upstream I/O error.
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        if crate::gzip::is_corrupt_stream(&source) {
            Self::CorruptCompressionStream { source, ctx }
        } else {
            Self::Io { source, ctx }
        }
    }

    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }

    /// The format rule that failed, if this is a structural error.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Self::Format { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Stream position of the failure; `None` for open errors.
    pub fn context(&self) -> Option<IoContext> {
        match self {
            Self::Open { .. } => None,
            Self::CorruptCompressionStream { ctx, .. }
            | Self::Io { ctx, .. }
            | Self::Format { ctx, .. } => Some(*ctx),
        }
    }
}
