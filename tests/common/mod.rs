#![allow(dead_code)]

use fastq_stream::{FastqReader, FastqRecord, ReaderOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const GOLDEN: &str = "\
@NODESC:header
GATTACA
+
BB>B@FA
@M01321:49:000000000-A6HWP:1:1101:17009:2216 1:N:0:1
CGTTAGCGCAGGGGGCATCTTCACACTGGTGACAGGTAACCGCCGTAGTAAAGGTTCCGCCTTTCACT
+
AAAAABF@BBBDGGGG?FFGFGHBFBFBFABBBHGGGFHHCEFGGGGG?FGFFHEDG3EFGGGHEGHG
@FASTQ contains multiple spaces in description
CGGCTGGTCAGGCTGACATCGCCGCCGGCCTGCAGCGAGCCGCTGC
+
FAFAF;F/9;.:/;999B/9A.DFFF;-->.AAB/FC;9-@-=;=.
";

fn rec(id: &str, description: &str, sequence: &str, quality: &str) -> FastqRecord {
    FastqRecord {
        id: id.to_string(),
        description: description.to_string(),
        sequence: sequence.as_bytes().to_vec(),
        quality: quality.as_bytes().to_vec(),
    }
}

pub fn golden() -> Vec<FastqRecord> {
    vec![
        rec("NODESC:header", "", "GATTACA", "BB>B@FA"),
        rec(
            "M01321:49:000000000-A6HWP:1:1101:17009:2216",
            "1:N:0:1",
            "CGTTAGCGCAGGGGGCATCTTCACACTGGTGACAGGTAACCGCCGTAGTAAAGGTTCCGCCTTTCACT",
            "AAAAABF@BBBDGGGG?FFGFGHBFBFBFABBBHGGGFHHCEFGGGGG?FGFFHEDG3EFGGGHEGHG",
        ),
        rec(
            "FASTQ",
            "contains multiple spaces in description",
            "CGGCTGGTCAGGCTGACATCGCCGCCGGCCTGCAGCGAGCCGCTGC",
            "FAFAF;F/9;.:/;999B/9A.DFFF;-->.AAB/FC;9-@-=;=.",
        ),
    ]
}

pub fn open_str(data: &'static str) -> FastqReader {
    open_bytes(data.as_bytes())
}

pub fn open_bytes(data: &'static [u8]) -> FastqReader {
    let opts = ReaderOptions::default();
    FastqReader::from_reader(data, opts).unwrap()
}

pub fn open_path(path: &Path, opts: ReaderOptions) -> FastqReader {
    FastqReader::from_path(path, opts).unwrap()
}

pub fn open_stream<R: Read + Send + 'static>(src: R, opts: ReaderOptions) -> FastqReader {
    FastqReader::from_reader(src, opts).unwrap()
}

pub fn read_all(fq: FastqReader) -> Vec<FastqRecord> {
    fq.map(Result::unwrap).collect()
}

pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Serves `data`, then fails every further read.
pub struct FailAfter {
    data: Vec<u8>,
    pos: usize,
}

impl FailAfter {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Err(io::Error::other("device went away"));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Counts how many times the wrapped source was dropped.
pub struct DropCounter<R> {
    inner: R,
    drops: Arc<AtomicUsize>,
}

impl<R> DropCounter<R> {
    pub fn new(inner: R) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                drops: Arc::clone(&drops),
            },
            drops,
        )
    }
}

impl<R: Read> Read for DropCounter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R> Drop for DropCounter<R> {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn drops(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
