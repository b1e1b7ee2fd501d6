//! Report construction throughput for large rounds.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use battle_summary::combat::{
    Combatant, CombatantRef, SequenceRank, SummaryBuilder, TargetIndexRank,
};

fn roster(size: u64) -> Vec<CombatantRef> {
    (0..size)
        .map(|id| CombatantRef::new(Combatant::new(id, format!("unit-{id}"), (id % 7) as i32)))
        .collect()
}

fn filled_builder(units: &[CombatantRef], attacks: usize) -> SummaryBuilder<CombatantRef> {
    let mut builder = SummaryBuilder::new();
    for i in 0..attacks {
        let attacker = units[(i * 7) % units.len()].clone();
        let target = units[(i * 13 + 5) % units.len()].clone();
        builder.record(attacker, target);
    }
    builder
}

fn bench_summary(c: &mut Criterion) {
    let units = roster(64);
    let attacks = 4_096usize;

    let mut group = c.benchmark_group("summary");
    group.throughput(Throughput::Elements(attacks as u64));

    group.bench_function("record_4096", |b| {
        b.iter_batched(
            SummaryBuilder::<CombatantRef>::new,
            |mut builder| {
                for i in 0..attacks {
                    builder.record(
                        units[(i * 7) % units.len()].clone(),
                        units[(i * 13 + 5) % units.len()].clone(),
                    );
                }
                black_box(builder)
            },
            BatchSize::SmallInput,
        )
    });

    let builder = filled_builder(&units, attacks);
    group.bench_function("report_sequence_4096", |b| {
        b.iter(|| black_box(builder.report_ranked(&SequenceRank)))
    });
    group.bench_function("report_target_index_4096", |b| {
        b.iter(|| black_box(builder.report_ranked(&TargetIndexRank)))
    });

    group.finish();
}

criterion_group!(benches, bench_summary);
criterion_main!(benches);
