use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tally_core::config::EngineConfig;
use tally_core::engine::RecurringEngine;
use tally_core::models::{
    FixedFrequency, InstallmentPeriod, NewTransactionData, RecurrenceRule, Transaction,
};
use tally_core::recurrence::next_fixed_date;
use tally_core::series::expand;
use tally_core::store::MemoryStore;

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
}

fn create_template(rule: RecurrenceRule) -> Transaction {
    NewTransactionData {
        description: "Benchmark template".to_string(),
        amount_cents: 10_000,
        date: base_date(),
        recurrence: Some(rule),
        ..Default::default()
    }
    .into_transaction(base_date())
}

fn bench_next_fixed_date(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_fixed_date");
    for frequency in [FixedFrequency::Daily, FixedFrequency::Monthly, FixedFrequency::Annual] {
        group.bench_with_input(
            BenchmarkId::from_parameter(frequency),
            &frequency,
            |b, frequency| b.iter(|| next_fixed_date(black_box(base_date()), *frequency).unwrap()),
        );
    }
    group.finish();
}

fn bench_fixed_expansion(c: &mut Criterion) {
    let template = create_template(RecurrenceRule::Fixed(FixedFrequency::Daily));
    let mut group = c.benchmark_group("fixed_expansion");

    for days in [30, 365, 1095].iter() {
        let target = base_date() + Duration::days(*days);
        group.bench_with_input(BenchmarkId::new("days", days), days, |b, _| {
            b.iter(|| expand(black_box(&template), &[], black_box(target)).unwrap())
        });
    }
    group.finish();
}

fn bench_expansion_against_known(c: &mut Criterion) {
    let template = create_template(RecurrenceRule::Fixed(FixedFrequency::Daily));
    let target = base_date() + Duration::days(1095);
    let mut known = vec![template.clone()];
    known.extend(expand(&template, &[], target).unwrap());

    c.bench_function("fixed_expansion_fully_known", |b| {
        b.iter(|| expand(black_box(&template), black_box(&known), target).unwrap())
    });
}

fn bench_installment_expansion(c: &mut Criterion) {
    let template = create_template(RecurrenceRule::installments(360, InstallmentPeriod::Months));
    let target = base_date() + Duration::days(365 * 31);

    c.bench_function("installment_expansion_360", |b| {
        b.iter(|| expand(black_box(&template), &[], black_box(target)).unwrap())
    });
}

fn bench_renewal_run(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let now = base_date();

    c.bench_function("renew_all_50_templates", |b| {
        b.iter_batched(
            || {
                runtime.block_on(async {
                    let engine =
                        RecurringEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default());
                    for i in 0..50 {
                        let rule = if i % 2 == 0 {
                            RecurrenceRule::Fixed(FixedFrequency::Weekly)
                        } else {
                            RecurrenceRule::installments(48, InstallmentPeriod::Months)
                        };
                        let data = NewTransactionData {
                            description: format!("Template {}", i),
                            amount_cents: 1_000 + i,
                            date: now,
                            recurrence: Some(rule),
                            ..Default::default()
                        };
                        engine.create_template(data, now).await.unwrap();
                    }
                    engine
                })
            },
            |engine| runtime.block_on(engine.renew_all(black_box(now))).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_next_fixed_date,
    bench_fixed_expansion,
    bench_expansion_against_known,
    bench_installment_expansion,
    bench_renewal_run
);
criterion_main!(benches);
