//! Settlement plan computation
//!
//! Greedy largest-first matching of debtors against creditors.
//!
//! # Algorithm
//!
//! 1. Split members into debtors (balance < -ε) and creditors (balance > +ε)
//! 2. Sort both by amount, largest first; ties by member ID ascending
//! 3. Two-pointer sweep: transfer `min(debtor, creditor)`, emit it if > ε
//! 4. Advance whichever side dropped below ε; pointers never rewind
//!
//! At most `debtors + creditors - 1` transfers are emitted. The result is not
//! guaranteed to use the fewest possible transfers.
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +200
//!   B: -100
//!   C: -100
//!
//! Plan:
//!   B pays A: 100
//!   C pays A: 100
//! ```

use crate::types::{BalanceMap, NetTransfer, PlanStats};
use rust_decimal::Decimal;
use std::collections::HashSet;
use trip_ledger::{MemberId, Settlement};

/// Balances within this distance of zero count as settled
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Remaining amount for one side of the sweep
#[derive(Debug, Clone)]
struct Position<'a> {
    member: &'a MemberId,
    remaining: Decimal,
}

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Balances within this distance of zero are ignored
    tolerance: Decimal,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Settlement tolerance
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Compute suggested payments that bring every balance to zero
    pub fn compute_settlement_plan(&self, balances: &BalanceMap) -> Vec<NetTransfer> {
        let total = imbalance(balances);
        if total.abs() > self.tolerance {
            tracing::warn!(
                imbalance = %total,
                "Balances do not net to zero; leftover amounts are not settled"
            );
        }

        let mut debtors: Vec<Position<'_>> = balances
            .iter()
            .filter(|(_, balance)| **balance < -self.tolerance)
            .map(|(member, balance)| Position {
                member,
                remaining: -*balance,
            })
            .collect();

        let mut creditors: Vec<Position<'_>> = balances
            .iter()
            .filter(|(_, balance)| **balance > self.tolerance)
            .map(|(member, balance)| Position {
                member,
                remaining: *balance,
            })
            .collect();

        // Stable sorts over the ID-ordered map: equal amounts stay in ID order
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut plan = Vec::new();
        let (mut d, mut c) = (0, 0);

        while d < debtors.len() && c < creditors.len() {
            let amount = debtors[d].remaining.min(creditors[c].remaining);

            if amount > self.tolerance {
                tracing::debug!(
                    from = %debtors[d].member,
                    to = %creditors[c].member,
                    amount = %amount,
                    "Matched transfer"
                );
                plan.push(NetTransfer {
                    from: debtors[d].member.clone(),
                    to: creditors[c].member.clone(),
                    amount,
                });
            }

            debtors[d].remaining -= amount;
            creditors[c].remaining -= amount;

            if self.drained(debtors[d].remaining) {
                d += 1;
            }
            if self.drained(creditors[c].remaining) {
                c += 1;
            }
        }

        plan
    }

    /// Check if every balance is within tolerance of zero
    pub fn is_settled(&self, balances: &BalanceMap) -> bool {
        balances.values().all(|b| b.abs() <= self.tolerance)
    }

    /// Summarize a plan against the balances it was computed from
    pub fn stats(&self, balances: &BalanceMap, plan: &[NetTransfer]) -> PlanStats {
        PlanStats {
            member_count: balances.len(),
            debtor_count: balances.values().filter(|b| **b < -self.tolerance).count(),
            creditor_count: balances.values().filter(|b| **b > self.tolerance).count(),
            transfer_count: plan.len(),
            total_transferred: plan.iter().map(|t| t.amount).sum(),
        }
    }

    fn drained(&self, remaining: Decimal) -> bool {
        remaining < self.tolerance || remaining.is_zero()
    }
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// Compute a settlement plan with the default tolerance
pub fn compute_settlement_plan(balances: &BalanceMap) -> Vec<NetTransfer> {
    NettingEngine::default().compute_settlement_plan(balances)
}

/// Sum of all balances
pub fn imbalance(balances: &BalanceMap) -> Decimal {
    balances.values().copied().sum()
}

/// Balances after every transfer in `plan` has been paid
pub fn apply_plan(balances: &BalanceMap, plan: &[NetTransfer]) -> BalanceMap {
    let mut projected = balances.clone();
    for transfer in plan {
        *projected.entry(transfer.from.clone()).or_default() += transfer.amount;
        *projected.entry(transfer.to.clone()).or_default() -= transfer.amount;
    }
    projected
}

/// Plan entries for which no settlement exists yet between the same pair
///
/// Settlements of any status count, so a debt already claimed as paid is not
/// offered again while it waits for confirmation.
pub fn outstanding_transfers(plan: &[NetTransfer], settlements: &[Settlement]) -> Vec<NetTransfer> {
    let initiated: HashSet<(&MemberId, &MemberId)> =
        settlements.iter().map(|s| (&s.from, &s.to)).collect();

    plan.iter()
        .filter(|t| !initiated.contains(&(&t.from, &t.to)))
        .cloned()
        .collect()
}
