// Chain Value encoding benchmarks: the operations a client serializes most.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use delegato_protocol::codec::{ChainArray, ChainDecode, ChainString, ChainTime, ChainValue, ObjectId};
use delegato_protocol::transaction::{localized, Language, Operation, PollCreate, PollVariant};

fn poll(variants: usize) -> Operation {
    let variants: ChainArray<PollVariant> = (0..variants)
        .map(|i| {
            PollVariant::new(localized([(Language::English, format!("Option {i}"))]).unwrap(), 1)
                .unwrap()
        })
        .collect();
    PollCreate {
        account: "1.2.5".parse().unwrap(),
        title: localized([
            (Language::Romanian, "Buget participativ"),
            (Language::English, "Participatory budget"),
        ])
        .unwrap(),
        topic: "1.9.1".parse().unwrap(),
        start_date: ChainTime::from_unix_seconds(1_600_000_000),
        end_date: ChainTime::from_unix_seconds(1_600_086_400),
        content: localized([(Language::English, "Which project should be funded?")]).unwrap(),
        variants,
        delegation_allowed: true.into(),
        sign_required: false.into(),
    }
    .into()
}

fn bench_object_id(c: &mut Criterion) {
    c.bench_function("codec/object_id_parse", |b| {
        b.iter(|| black_box("1.2.123456").parse::<ObjectId>().unwrap());
    });
}

fn bench_string_round_trip(c: &mut Criterion) {
    let text = ChainString::new("Ce proiect ar trebui finanțat în acest an?".repeat(8));
    let hex = text.bytes();
    c.bench_function("codec/string_encode", |b| b.iter(|| text.bytes()));
    c.bench_function("codec/string_decode", |b| {
        b.iter(|| ChainString::from_bytes(black_box(&hex)).unwrap());
    });
}

fn bench_poll_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/poll_create_bytes");

    for variants in [2usize, 8, 32] {
        let operation = poll(variants);
        group.throughput(Throughput::Elements(variants as u64));
        group.bench_with_input(BenchmarkId::from_parameter(variants), &operation, |b, op| {
            b.iter(|| op.to_bytes());
        });
    }

    group.finish();
}

fn bench_poll_create_json(c: &mut Criterion) {
    let operation = poll(8);
    c.bench_function("codec/poll_create_value", |b| b.iter(|| operation.value()));
}

criterion_group!(
    benches,
    bench_object_id,
    bench_string_round_trip,
    bench_poll_create,
    bench_poll_create_json,
);
criterion_main!(benches);
