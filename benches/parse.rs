use criterion::{Criterion, criterion_group, criterion_main};
use fastq_stream::{FastqReader, ReaderOptions};
use std::io::{Cursor, Write};

const RECORD: &str = "1:N:0:1\nACGTACGTACGTACGT\n+\n################\n";

fn sample() -> Vec<u8> {
    let mut data = String::new();
    for i in 0..2000 {
        data.push_str(&format!("@r{i} {RECORD}"));
    }
    data.into_bytes()
}

fn count_bases(bytes: Vec<u8>, opts: ReaderOptions) -> usize {
    let fq = FastqReader::from_reader(Cursor::new(bytes), opts).unwrap();
    let mut n = 0usize;
    for rec in fq {
        let r = rec.unwrap();
        n += r.len();
    }
    n
}

fn bench_parse(c: &mut Criterion) {
    let data = sample();
    c.bench_function("parse_2000_plain", |b| {
        b.iter(|| count_bases(data.clone(), ReaderOptions::default()))
    });

    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(&data).unwrap();
    let gz = enc.finish().unwrap();
    c.bench_function("parse_2000_gzip", |b| {
        b.iter(|| count_bases(gz.clone(), ReaderOptions::gzip()))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
