use crate::error::FastqError;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;

pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == GZIP_MAGIC)
}

/// Peek at the buffered head of a stream without consuming it.
pub fn starts_with_gzip_magic<R: BufRead>(r: &mut R) -> io::Result<bool> {
    let head = r.fill_buf()?;
    Ok(head.starts_with(&GZIP_MAGIC))
}

pub fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Magic-byte check on an opened file; failures are reported as open errors.
pub fn file_is_gzip(f: &File, path: &Path) -> Result<bool, FastqError> {
    looks_like_gzip(f).map_err(|e| FastqError::open_err(path, e))
}

pub fn open_file(path: &Path) -> Result<File, FastqError> {
    File::open(path).map_err(|e| FastqError::open_err(path, e))
}
