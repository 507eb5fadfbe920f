//! Benchmarks for harmonic expansion and combo publication.
//!
//! Run with: cargo bench
//!
//! Expansion runs once per host block on the audio thread, so it has to stay
//! far below the block deadline even for dense chords. Block sizes here are
//! input events per block, not samples.
//!
//! Benchmark groups:
//!   - expand/*   Whole-block expansion at several event densities
//!   - store/*    Control-side edits including the combo publication

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use additive_midi::{
    expander::HarmonicExpander,
    harmonic::HarmonicProfile,
    io::midi::TimedEvent,
    processor::{AdditiveMidi, ProcessorConfig},
    store::{ComboSource, ProfileSlot, ProfileStore},
};

/// Input events per block.
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

/// Alternating note-ons and note-offs spread over a 512-sample block.
fn note_block(len: usize) -> Vec<TimedEvent> {
    (0..len)
        .map(|i| {
            let key = 36 + (i % 48) as u8;
            let timing = (i * 512 / len.max(1)) as u32;
            if i % 2 == 0 {
                TimedEvent::note_on(timing, 1, key, 100)
            } else {
                TimedEvent::note_off(timing, 1, key)
            }
        })
        .collect()
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");

    for &size in BLOCK_SIZES {
        let input = note_block(size);

        // Nothing to add on note-on, releases still fan out
        let mut silent = HarmonicExpander::with_capacity(HarmonicProfile::silent(), size);
        group.bench_with_input(BenchmarkId::new("silent", size), &size, |b, _| {
            b.iter(|| black_box(silent.process_block(black_box(&input)).len()))
        });

        // Every harmonic active, the densest output
        let full = HarmonicProfile::new([1.0; 8]);
        let mut dense = HarmonicExpander::with_capacity(full, size);
        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, _| {
            b.iter(|| black_box(dense.process_block(black_box(&input)).len()))
        });

        // Through the processor and the ring reader
        let (mut processor, _store) = AdditiveMidi::new(ProcessorConfig {
            max_block_events: size,
            ..ProcessorConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("processor", size), &size, |b, _| {
            b.iter(|| black_box(processor.process_midi(black_box(&input)).len()))
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    // Drained every iteration so the ring never fills
    let (mut store, mut reader) = ProfileStore::with_reader(64);
    let mut value = 0.0f32;
    group.bench_function("set_value", |b| {
        b.iter(|| {
            value = (value + 0.01) % 1.0;
            store
                .set_value(ProfileSlot::Harm1, 3, black_box(value))
                .unwrap();
            black_box(reader.latest());
        })
    });

    let harm1 = [0.25f32; 8];
    let harm2 = [0.75f32; 8];
    group.bench_function("replace_all", |b| {
        b.iter(|| {
            store
                .replace_all(black_box(&harm1), black_box(&harm2), black_box(0.5))
                .unwrap();
            black_box(reader.latest());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_expand, bench_store);
criterion_main!(benches);
