/// Whether the byte source is run through the gzip filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionType {
    /// Read bytes as-is; compressed input surfaces as a parse error.
    #[default]
    None,
    /// Always decompress, regardless of file naming.
    Gzip,
    /// Decompress when the path ends in `.gz` or the stream starts with the gzip magic.
    Auto,
}

/// Reader configuration, fixed for the lifetime of a reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    pub compression_type: CompressionType,
}

impl ReaderOptions {
    pub fn gzip() -> Self {
        Self {
            compression_type: CompressionType::Gzip,
        }
    }
}
