use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use protocol::codec::EditorMessageFilter;
use protocol::message::EditorEnvelope;

fn sample_export_raw() -> String {
    serde_json::to_string(&EditorEnvelope::avatar_exported(
        "https://models.readyplayer.me/64bfa15f0e72c63d7c3934a6.glb",
    ))
    .unwrap()
}

fn sample_untrusted_raw() -> String {
    let mut envelope = EditorEnvelope::frame_ready();
    envelope.source = Some("analytics-widget".to_owned());
    serde_json::to_string(&envelope).unwrap()
}

fn bench_handled_messages(c: &mut Criterion) {
    let filter = EditorMessageFilter::default();
    let raw = sample_export_raw();
    c.bench_with_input(BenchmarkId::new("decode", "export"), &raw, |b, raw| {
        b.iter(|| filter.decode(black_box(raw)).unwrap());
    });
}

fn bench_discarded_messages(c: &mut Criterion) {
    let filter = EditorMessageFilter::default();

    let untrusted = sample_untrusted_raw();
    c.bench_with_input(
        BenchmarkId::new("decode", "untrusted"),
        &untrusted,
        |b, raw| {
            b.iter(|| filter.decode(black_box(raw)).unwrap());
        },
    );

    let garbage = "definitely not a json payload".to_owned();
    c.bench_with_input(
        BenchmarkId::new("decode", "non_json"),
        &garbage,
        |b, raw| {
            b.iter(|| filter.decode(black_box(raw)).unwrap());
        },
    );
}

fn handshake_benches(c: &mut Criterion) {
    bench_handled_messages(c);
    bench_discarded_messages(c);
}

criterion_group!(benches, handshake_benches);
criterion_main!(benches);
