//! Benchmarks for cached seeks against brute-force replay.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use algo_replay::{
    domains::{ArrayDomain, sorting::bubble_sort},
    playback::{CACHE_INTERVAL, SnapshotCache},
    schema::ArrayPattern,
    trace::replay,
};

fn bench_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_to_end");

    for len in [16, 64, 128] {
        let values = ArrayPattern::Random {
            len,
            max: 1000,
            seed: 42,
        }
        .generate();
        let recording = bubble_sort(&values);
        let events = &recording.events;
        let target = events.len() as isize - 1;
        let cache = SnapshotCache::build(&ArrayDomain, &recording.initial, events, CACHE_INTERVAL);

        group.bench_with_input(
            BenchmarkId::new("cached", events.len()),
            &target,
            |b, &target| {
                b.iter(|| cache.seek(&ArrayDomain, events, black_box(target)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("replay", events.len()),
            &target,
            |b, &target| {
                b.iter(|| replay(&ArrayDomain, &recording.initial, events, black_box(target)));
            },
        );
    }

    group.finish();
}

fn bench_cache_interval(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_interval");

    let values = ArrayPattern::Reversed { len: 96 }.generate();
    let recording = bubble_sort(&values);
    let events = &recording.events;
    let middle = (events.len() / 2) as isize;

    for interval in [1, 10, 50, 200] {
        group.bench_with_input(
            BenchmarkId::new("build", interval),
            &interval,
            |b, &interval| {
                b.iter(|| SnapshotCache::build(&ArrayDomain, &recording.initial, events, interval));
            },
        );

        let cache = SnapshotCache::build(&ArrayDomain, &recording.initial, events, interval);
        group.bench_with_input(
            BenchmarkId::new("seek_middle", interval),
            &middle,
            |b, &middle| {
                b.iter(|| cache.seek(&ArrayDomain, events, black_box(middle)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_seek, bench_cache_interval);
criterion_main!(benches);
