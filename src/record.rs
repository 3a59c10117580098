/// One validated FASTQ read. `sequence.len() == quality.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: String,
    pub description: String,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

impl FastqRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
