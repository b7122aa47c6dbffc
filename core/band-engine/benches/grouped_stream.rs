//! FILENAME: core/band-engine/benches/grouped_stream.rs
//! Benchmarks for sorting and streaming grouped rows.

use std::cmp::Ordering;

use band_engine::{Aggregate, BandError, GroupedStreamBuilder, GroupingPolicy, LevelRollup};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// (year, month, day, amount); level 3 = year, 2 = month, 1 = day.
type Row = (u16, u8, u8, f64);

#[derive(Default)]
struct Sum {
    rollup: LevelRollup,
    total: f64,
}

impl Aggregate<Row> for Sum {
    fn accumulate(&mut self, row: &Row) -> Result<(), BandError> {
        self.rollup.ensure_open("accumulate")?;
        self.total += row.3;
        Ok(())
    }

    fn accumulate_level(&mut self, _child: &Self, level: usize) -> Result<(), BandError> {
        self.rollup.accumulate_level(level)
    }

    fn finish(&mut self) {
        self.rollup.finish();
    }

    fn is_finished(&self) -> bool {
        self.rollup.is_finished()
    }

    fn clear(&mut self) {
        self.rollup.clear();
        self.total = 0.0;
    }
}

struct Calendar;

impl GroupingPolicy for Calendar {
    type Row = Row;
    type Aggregate = Sum;

    fn level_count(&self) -> usize {
        3
    }

    fn compare_level(&self, a: &Row, b: &Row, level: usize) -> Result<Ordering, BandError> {
        match level {
            1 => Ok(a.2.cmp(&b.2)),
            2 => Ok(a.1.cmp(&b.1)),
            3 => Ok(a.0.cmp(&b.0)),
            _ => Err(BandError::LevelOutOfRange { level, max: 3 }),
        }
    }

    fn new_aggregate(&self, _level: usize) -> Result<Sum, BandError> {
        Ok(Sum::default())
    }
}

fn create_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let year = 2000 + (i % 7) as u16;
            let month = (i % 12) as u8 + 1;
            let day = (i % 28) as u8 + 1;
            (year, month, day, i as f64 * 0.5)
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let builder = GroupedStreamBuilder::new(Calendar);
    let mut group = c.benchmark_group("sort");

    for count in [1_000, 10_000, 100_000] {
        let rows = create_rows(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| builder.sort(black_box(rows.clone())).unwrap())
        });
    }
    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let builder = GroupedStreamBuilder::new(Calendar);
    let mut group = c.benchmark_group("stream");

    for count in [1_000, 10_000, 100_000] {
        let rows = builder.sort(create_rows(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| {
                let stream = builder.build(black_box(rows.iter().copied())).unwrap();
                stream.map(Result::unwrap).count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sort, bench_stream);
criterion_main!(benches);
