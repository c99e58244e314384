//! Benchmarks for digest streaming and RSA verification
//!
//! Run with: cargo bench --bench crypto_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use modsig_crypto::prelude::*;
use modsig_test_helpers::prelude::*;
use std::hint::black_box;
use std::io::Cursor;

fn bench_digest(c: &mut Criterion) {
    let content = vec![0x5Au8; 1024 * 1024];
    let mut group = c.benchmark_group("digest_1mb");
    group.throughput(Throughput::Bytes(content.len() as u64));

    for hash in HashAlgorithm::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(hash), &hash, |b, &hash| {
            let provider = RustCryptoProvider::new();
            b.iter(|| {
                let mut cursor = Cursor::new(black_box(content.as_slice()));
                let _digest = must(provider.digest(hash, &mut cursor, content.len() as u64));
            });
        });
    }
    group.finish();
}

fn bench_chunk_size(c: &mut Criterion) {
    let content = vec![0xA5u8; 4 * 1024 * 1024];
    let mut group = c.benchmark_group("sha256_chunk_size");
    group.throughput(Throughput::Bytes(content.len() as u64));

    for chunk in [4096usize, 8192, 32768, 65536] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            let provider = RustCryptoProvider::with_chunk_size(chunk);
            b.iter(|| {
                let mut cursor = Cursor::new(black_box(content.as_slice()));
                let _digest = must(provider.digest(
                    HashAlgorithm::Sha256,
                    &mut cursor,
                    content.len() as u64,
                ));
            });
        });
    }
    group.finish();
}

fn bench_rsa_verify(c: &mut Criterion) {
    let provider = default_provider();
    let cert = must(provider.cert_from_bytes(SIGNER_A_CERT_PEM));
    let content = vec![0u8; 1024];
    let digest = digest_of(HashAlgorithm::Sha256, &content);
    let signature = TestSigner::A.sign(HashAlgorithm::Sha256, &content);

    c.bench_function("rsa2048_pkcs1v15_verify", |b| {
        b.iter(|| {
            let valid = provider.verify(
                cert.public_key(),
                HashAlgorithm::Sha256,
                black_box(&digest),
                black_box(&signature),
            );
            black_box(valid)
        });
    });
}

fn bench_cert_parse(c: &mut Criterion) {
    let provider = default_provider();
    c.bench_function("cert_from_pem", |b| {
        b.iter(|| must(provider.cert_from_bytes(black_box(SIGNER_A_CERT_PEM))));
    });
    c.bench_function("cert_from_der", |b| {
        b.iter(|| must(provider.cert_from_bytes(black_box(SIGNER_A_CERT_DER))));
    });
}

criterion_group!(
    benches,
    bench_digest,
    bench_chunk_size,
    bench_rsa_verify,
    bench_cert_parse
);
criterion_main!(benches);
