use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payment_dashboard::{
    aggregate::{average_by_installments, revenue_by_type},
    dataset::{Dataset, PaymentRecord},
    page,
};

fn generate_payments(rows: usize) -> Dataset {
    (0..rows)
        .map(|i| {
            let payment_type = match i % 5 {
                0 | 1 => "credit_card",
                2 => "boleto",
                3 => "voucher",
                _ => "debit_card",
            };
            let installments = (i % 12) as i64 + 1;
            let cents = ((i * 7_919) % 250_000) as i64 + 500;
            PaymentRecord::new(payment_type, installments, Decimal::new(cents, 2))
        })
        .collect()
}

fn bench_aggregations(c: &mut Criterion) {
    let dataset = generate_payments(100_000);

    c.bench_function("revenue_by_type_100k", |b| {
        b.iter(|| revenue_by_type(&dataset))
    });
    c.bench_function("average_by_installments_100k", |b| {
        b.iter(|| average_by_installments(&dataset))
    });
    c.bench_function("render_dashboard_100k", |b| {
        b.iter(|| page::render_dashboard(&dataset))
    });
}

criterion_group!(benches, bench_aggregations);
criterion_main!(benches);
