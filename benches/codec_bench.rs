use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::hint::black_box;
use tftp_wire::{Data, Message, OptionAck, Request, TftpCodec, TransferMode, WireMessage};
use tokio_util::codec::{Decoder, Encoder};

#[allow(clippy::unwrap_used)]
fn bench_data_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_encode_decode");
    let block_sizes = [8usize, 512, 1428, 8192, 65464];

    for &size in &block_sizes {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || Message::Data(Data::new(1, vec![0u8; size])),
                |msg| {
                    let mut buf = BytesMut::with_capacity(size + 4);
                    let mut codec = TftpCodec::default();
                    codec.encode(msg, &mut buf).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let bytes = Data::new(1, vec![0u8; size]).to_bytes().unwrap();
            let mut codec = TftpCodec::default();
            b.iter_batched(
                || BytesMut::from(&bytes[..]),
                |mut buf| {
                    let decoded = codec.decode(&mut buf);
                    assert!(decoded.is_ok());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_request_with_options(c: &mut Criterion) {
    let rrq = Request::read("pxelinux.cfg/01-aa-bb-cc-dd-ee-ff", TransferMode::Octet)
        .with_option("blksize", "1456")
        .with_option("tsize", "0")
        .with_option("timeout", "3");
    let bytes = rrq.to_bytes().unwrap();

    c.bench_function("request_encode", |b| {
        let mut buf = vec![0u8; rrq.encoded_len()];
        b.iter(|| black_box(&rrq).encode(&mut buf).unwrap())
    });
    c.bench_function("request_decode", |b| {
        b.iter(|| Message::decode(black_box(&bytes)).unwrap())
    });

    let oack = OptionAck::default()
        .with_option("blksize", "1456")
        .with_option("tsize", "4194304");
    let oack_bytes = oack.to_bytes().unwrap();
    c.bench_function("oack_decode", |b| {
        b.iter(|| OptionAck::decode(black_box(&oack_bytes)).unwrap())
    });
}

criterion_group!(benches, bench_data_encode_decode, bench_request_with_options);
criterion_main!(benches);
