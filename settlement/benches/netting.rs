//! Benchmarks for balance folding and plan computation.
//!
//! Run with: cargo bench -p settlement

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use settlement::{compute_balances, BalanceMap, NettingEngine, SettlementPolicy};
use trip_ledger::{split_equally, Currency, Expense, MemberId};
use uuid::Uuid;

fn members(count: usize) -> Vec<MemberId> {
    (0..count).map(|i| MemberId::new(format!("m{}", i))).collect()
}

/// Zero-sum balances with a deterministic spread of debtors and creditors.
fn build_balances(count: usize) -> BalanceMap {
    let mut balances: BalanceMap = members(count)
        .into_iter()
        .enumerate()
        .map(|(i, m)| {
            let cents = ((i * 7919) % 20_001) as i64 - 10_000;
            (m, Decimal::new(cents, 2))
        })
        .collect();
    let total: Decimal = balances.values().copied().sum();
    balances.insert(MemberId::new("last"), -total);
    balances
}

/// Expenses paid in rotation, each split equally among everyone.
fn build_expenses(members: &[MemberId], count: usize) -> Vec<Expense> {
    (0..count)
        .map(|i| {
            let amount = Decimal::new(((i * 3571) % 50_000 + 100) as i64, 2);
            Expense {
                expense_id: Uuid::now_v7(),
                description: format!("expense {}", i),
                amount,
                paid_by: members[i % members.len()].clone(),
                splits: split_equally(amount, members, Currency::USD).unwrap(),
                date: Utc::now(),
            }
        })
        .collect()
}

fn bench_settlement_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement_plan");
    let engine = NettingEngine::default();

    for count in [10usize, 100, 1_000].iter() {
        let balances = build_balances(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| engine.compute_settlement_plan(black_box(&balances)));
        });
    }

    group.finish();
}

fn bench_compute_balances(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balances");
    let members = members(12);

    for count in [100usize, 1_000, 10_000].iter() {
        let expenses = build_expenses(&members, *count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                compute_balances(
                    black_box(&members),
                    black_box(&expenses),
                    &[],
                    SettlementPolicy::ConfirmedOnly,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_settlement_plan, bench_compute_balances);
criterion_main!(benches);
