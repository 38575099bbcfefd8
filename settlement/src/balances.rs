//! Balance computation
//!
//! Folds a trip's expenses and settlements into one signed balance per
//! member:
//!
//! - expense: payer `+amount`, every split member `-owes`
//! - settlement (if the policy applies it): `from` `+amount`, `to` `-amount`
//!
//! # Example
//!
//! ```text
//! A pays 300, split A/B/C 100 each
//!   A: +300 - 100 = +200
//!   B:        - 100 = -100
//!   C:        - 100 = -100
//!
//! Confirmed settlement B -> A 100
//!   A: +100, B: 0, C: -100
//! ```

use crate::{
    types::{BalanceMap, SettlementPolicy},
    Result,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use trip_ledger::{
    validation::{checked_sum, ensure_non_negative, ensure_positive},
    Expense, MemberId, Settlement, TripSnapshot,
};

/// Compute net balances for a trip
///
/// Every declared member appears in the result, even at exactly zero. IDs
/// referenced by expenses or settlements but missing from `members` are
/// included as well so no money is dropped; each is logged once.
///
/// Negative expense or split amounts and non-positive settlement amounts are
/// rejected before any balance is computed. Totals that do not fit a
/// `Decimal` are rejected with `InvalidAmount` instead of overflowing.
pub fn compute_balances(
    members: &[MemberId],
    expenses: &[Expense],
    settlements: &[Settlement],
    policy: SettlementPolicy,
) -> Result<BalanceMap> {
    validate_inputs(expenses, settlements)?;

    let mut balances: BalanceMap = members
        .iter()
        .map(|member| (member.clone(), Decimal::ZERO))
        .collect();
    let mut unlisted = BTreeSet::new();

    for expense in expenses {
        adjust(&mut balances, &mut unlisted, &expense.paid_by, expense.amount)?;
        for split in &expense.splits {
            adjust(&mut balances, &mut unlisted, &split.member, -split.owes)?;
        }
    }

    for settlement in settlements.iter().filter(|s| policy.applies(s.status)) {
        adjust(&mut balances, &mut unlisted, &settlement.from, settlement.amount)?;
        adjust(&mut balances, &mut unlisted, &settlement.to, -settlement.amount)?;
    }

    // Plan totals are bounded by either side's sum
    let credits = balances.values().copied().filter(|b| b.is_sign_positive());
    checked_sum("Total owed to members", credits)?;
    let debts = balances.values().copied().filter(|b| b.is_sign_negative());
    checked_sum("Total owed by members", debts)?;

    for member in &unlisted {
        tracing::warn!(
            member = %member,
            balance = %balances[member],
            "Member referenced by records but not declared on the trip"
        );
    }

    Ok(balances)
}

/// Compute net balances from a snapshot
pub fn snapshot_balances(snapshot: &TripSnapshot, policy: SettlementPolicy) -> Result<BalanceMap> {
    compute_balances(
        &snapshot.members,
        &snapshot.expenses,
        &snapshot.settlements,
        policy,
    )
}

fn adjust(
    balances: &mut BalanceMap,
    unlisted: &mut BTreeSet<MemberId>,
    member: &MemberId,
    delta: Decimal,
) -> Result<()> {
    match balances.get_mut(member) {
        Some(balance) => {
            *balance = balance.checked_add(delta).ok_or_else(|| {
                trip_ledger::Error::InvalidAmount(format!("Balance of {} is out of range", member))
            })?;
        }
        None => {
            unlisted.insert(member.clone());
            balances.insert(member.clone(), delta);
        }
    }
    Ok(())
}

fn validate_inputs(expenses: &[Expense], settlements: &[Settlement]) -> Result<()> {
    for expense in expenses {
        ensure_non_negative(&format!("Expense {} amount", expense.expense_id), expense.amount)?;
        for split in &expense.splits {
            ensure_non_negative(
                &format!("Expense {} share of {}", expense.expense_id, split.member),
                split.owes,
            )?;
        }
    }

    for settlement in settlements {
        ensure_positive(
            &format!("Settlement {} amount", settlement.settlement_id),
            settlement.amount,
        )?;
    }

    Ok(())
}
