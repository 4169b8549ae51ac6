// Key derivation, signing and recovery benchmarks for the Delegato client.
//
// Canonical signing retries with a new nonce until the signature is
// canonical, so its cost varies per message. The transaction group signs
// with several keys to show how that cost adds up.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use delegato_protocol::codec::{ChainTime, ChainValue};
use delegato_protocol::config::DEFAULT_CHAIN_ID;
use delegato_protocol::crypto::{KeyRole, PrivateKey, Signature};
use delegato_protocol::transaction::{PollVote, TransactionBuilder, UnsignedTransaction};

const MESSAGE: &[u8] = b"vote 1.11.7 from 1.2.5; ref_block=42";

fn key(index: usize) -> PrivateKey {
    PrivateKey::derive(
        &format!("voter{index}@example.com"),
        "correct horse battery",
        KeyRole::Active,
    )
    .unwrap()
}

fn transaction() -> UnsignedTransaction {
    TransactionBuilder::new(42, "0000002a1122334455667788")
        .unwrap()
        .expiration(ChainTime::from_unix_seconds(1_600_000_000))
        .operation(PollVote {
            account: "1.2.5".parse().unwrap(),
            variant: "1.11.7".parse().unwrap(),
        })
        .build()
        .unwrap()
}

fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("secp256k1/derive_from_credentials", |b| {
        b.iter(|| key(0));
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let key = key(0);
    c.bench_function("secp256k1/sign_canonical", |b| {
        b.iter(|| Signature::sign(MESSAGE, &key).unwrap());
    });
}

fn bench_recover(c: &mut Criterion) {
    let key = key(0);
    let signature = Signature::sign(MESSAGE, &key).unwrap();
    c.bench_function("secp256k1/recover_public_key", |b| {
        b.iter(|| signature.recover_public_key(MESSAGE));
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("secp256k1/sign_transaction");

    for count in [1usize, 2, 4] {
        let keys: Vec<PrivateKey> = (0..count).map(key).collect();
        let refs: Vec<&PrivateKey> = keys.iter().collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &refs, |b, refs| {
            b.iter(|| transaction().sign(DEFAULT_CHAIN_ID, refs).unwrap().bytes());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_sign_message,
    bench_recover,
    bench_sign_transaction,
);
criterion_main!(benches);
