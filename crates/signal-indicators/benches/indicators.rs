//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use signal_core::traits::{Indicator, MultiOutputIndicator};
use signal_core::types::{Bar, Series, Timeframe};
use signal_indicators::{BollingerBands, Ema, IndicatorEngine, Macd, Rsi};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_single_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for size in [1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("ema_200", size), &data, |b, data| {
            let ema = Ema::new(200);
            b.iter(|| ema.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("rsi_14", size), &data, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &data, |b, data| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("bollinger", size), &data, |b, data| {
            let bb = BollingerBands::new();
            b.iter(|| bb.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("IndicatorEngine");
    let engine = IndicatorEngine::new();

    for size in [50, 250, 1500].iter() {
        let bars = generate_test_data(*size)
            .into_iter()
            .enumerate()
            .map(|(i, close)| Bar::close_only(i as i64 * 60_000, close))
            .collect();
        let series = Series::from_bars("BENCH", Timeframe::Minute1, bars, *size);

        group.bench_with_input(BenchmarkId::new("analyze", size), &series, |b, series| {
            b.iter(|| engine.analyze(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_indicators, benchmark_engine);
criterion_main!(benches);
