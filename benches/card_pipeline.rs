use chrono::{DateTime, TimeZone, Utc};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use parcelview::{
    CardConfig, FeedKind, FilterConfig, HostStates, Tab, ViewState, build_card_view, normalize,
    prepare_feeds,
};
use std::hint::black_box;

mod common;
use common::{keyed_payload, sequence_payload, split_payload};

fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .expect("valid bench timestamp")
}

/// Benchmark normalization for each payload layout
fn bench_normalize_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_shapes");
    let count = 500;
    group.throughput(Throughput::Elements(count as u64));

    let layouts = [
        ("sequence", sequence_payload(count)),
        ("split", split_payload(count)),
        ("keyed_values", keyed_payload(count)),
    ];
    for (name, payload) in &layouts {
        group.bench_function(*name, |b| {
            b.iter(|| normalize(black_box(Some(payload)), black_box(FeedKind::Primary)));
        });
    }

    group.finish();
}

/// Benchmark normalize + cutoff + tab selection at different feed sizes
fn bench_prepare_and_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_and_select");
    let filter = FilterConfig::default();
    let now = bench_now();

    for count in [10, 100, 1000] {
        let payload = split_payload(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("parcels_{count}"), |b| {
            b.iter(|| {
                let feeds = prepare_feeds(black_box(Some(&payload)), None, &filter, now)
                    .expect("entity present");
                black_box(feeds.select(Tab::InTransit));
            });
        });
    }

    group.finish();
}

/// Benchmark the full card build including presentation
fn bench_card_view(c: &mut Criterion) {
    let mut states = HostStates::new();
    states.insert("sensor.postnl", split_payload(200));
    states.insert("sensor.postnl_sent", sequence_payload(50));
    let config = CardConfig {
        distribution_entity: "sensor.postnl_sent".into(),
        ..CardConfig::stub()
    };
    let view = ViewState::default().toggle_parcel("3S00000001");
    let now = bench_now().fixed_offset();

    c.bench_function("card_view_200", |b| {
        b.iter(|| build_card_view(black_box(&states), &config, &view, now));
    });
}

criterion_group!(
    benches,
    bench_normalize_shapes,
    bench_prepare_and_select,
    bench_card_view
);
criterion_main!(benches);
