use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use petalflow_pricing::{price_line, PricingTier};

fn bench_price_line(c: &mut Criterion) {
    let tiers: Vec<PricingTier> = (1..=8)
        .map(|i| PricingTier::new(i * 25, Decimal::from(i)))
        .collect();
    let base = Decimal::new(250, 2);

    c.bench_function("price_line/no_tiers", |b| {
        b.iter(|| price_line(black_box(base), black_box(60), black_box(&[])))
    });

    c.bench_function("price_line/eight_tiers", |b| {
        b.iter(|| price_line(black_box(base), black_box(120), black_box(&tiers)))
    });
}

criterion_group!(benches, bench_price_line);
criterion_main!(benches);
