//! In-memory trip ledger
//!
//! Holds one trip's members, expenses and settlements, and validates every
//! mutation before it is recorded. Readers take a [`TripSnapshot`].
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use trip_ledger::{Currency, MemberId, NewExpense, SplitDetail, TripLedger};
//! use uuid::Uuid;
//!
//! let members = vec![MemberId::new("a"), MemberId::new("b")];
//! let mut ledger = TripLedger::new(Uuid::now_v7(), Currency::USD, members);
//!
//! let expenses = ledger.add_expense(NewExpense {
//!     description: "Taxi".to_string(),
//!     amount: Decimal::from(40),
//!     paid_by: MemberId::new("a"),
//!     splits: vec![
//!         SplitDetail::new("a", Decimal::from(20)),
//!         SplitDetail::new("b", Decimal::from(20)),
//!     ],
//!     date: None,
//! }).unwrap();
//! assert_eq!(expenses.len(), 1);
//! ```

use crate::{
    types::{
        Currency, Expense, ExpenseUpdate, MemberId, NewExpense, NewSettlement, Settlement,
        SettlementStatus, TripSnapshot,
    },
    validation::{ensure_positive, validate_expense},
    Config, Error, Result,
};
use chrono::Utc;
use uuid::Uuid;

/// Expense and settlement records of a single trip
#[derive(Debug, Clone)]
pub struct TripLedger {
    trip_id: Uuid,
    currency: Currency,
    members: Vec<MemberId>,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
    config: Config,
}

impl TripLedger {
    /// Create empty ledger with default configuration
    pub fn new(trip_id: Uuid, currency: Currency, members: Vec<MemberId>) -> Self {
        Self::with_config(trip_id, currency, members, Config::default())
    }

    /// Create empty ledger with configuration
    pub fn with_config(
        trip_id: Uuid,
        currency: Currency,
        members: Vec<MemberId>,
        config: Config,
    ) -> Self {
        let mut ledger = Self {
            trip_id,
            currency,
            members: Vec::with_capacity(members.len()),
            expenses: Vec::new(),
            settlements: Vec::new(),
            config,
        };
        for member in members {
            ledger.add_member(member);
        }
        ledger
    }

    /// Rebuild ledger from a snapshot
    ///
    /// Records are taken as-is; snapshot contents are not re-validated.
    pub fn from_snapshot(snapshot: TripSnapshot, config: Config) -> Self {
        Self {
            trip_id: snapshot.trip_id,
            currency: snapshot.currency,
            members: snapshot.members,
            expenses: snapshot.expenses,
            settlements: snapshot.settlements,
            config,
        }
    }

    /// Trip ID
    pub fn trip_id(&self) -> Uuid {
        self.trip_id
    }

    /// Trip currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Declared members, in join order
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// All expenses, in recording order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// All settlements, in recording order
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Add member; returns `false` if already present
    pub fn add_member(&mut self, member: MemberId) -> bool {
        if self.members.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Record a new expense
    ///
    /// Returns the refreshed expense list.
    pub fn add_expense(&mut self, expense: NewExpense) -> Result<&[Expense]> {
        validate_expense(expense.amount, &expense.splits, self.config.split_tolerance)?;

        let expense = Expense {
            expense_id: Uuid::now_v7(),
            description: expense.description,
            amount: expense.amount,
            paid_by: expense.paid_by,
            splits: expense.splits,
            date: expense.date.unwrap_or_else(Utc::now),
        };

        tracing::debug!(
            trip_id = %self.trip_id,
            expense_id = %expense.expense_id,
            amount = %expense.amount,
            "Expense recorded"
        );

        self.expenses.push(expense);
        Ok(&self.expenses)
    }

    /// Apply a partial update to an expense
    ///
    /// The merged expense is validated as a whole before it replaces the
    /// stored one, so an amount change without matching splits is rejected.
    pub fn update_expense(&mut self, expense_id: Uuid, update: ExpenseUpdate) -> Result<&Expense> {
        let index = self.expense_index(expense_id)?;
        let current = &self.expenses[index];

        let merged = Expense {
            expense_id,
            description: update.description.unwrap_or_else(|| current.description.clone()),
            amount: update.amount.unwrap_or(current.amount),
            paid_by: update.paid_by.unwrap_or_else(|| current.paid_by.clone()),
            splits: update.splits.unwrap_or_else(|| current.splits.clone()),
            date: current.date,
        };

        validate_expense(merged.amount, &merged.splits, self.config.split_tolerance)?;

        self.expenses[index] = merged;
        Ok(&self.expenses[index])
    }

    /// Remove an expense
    pub fn delete_expense(&mut self, expense_id: Uuid) -> Result<Expense> {
        let index = self.expense_index(expense_id)?;
        Ok(self.expenses.remove(index))
    }

    /// Record a settlement payment
    pub fn record_settlement(&mut self, settlement: NewSettlement) -> Result<&Settlement> {
        ensure_positive("Settlement amount", settlement.amount)?;
        if settlement.from == settlement.to {
            return Err(Error::SelfSettlement(settlement.from.to_string()));
        }

        let now = Utc::now();
        let confirmed_at = settlement.status.is_confirmed().then_some(now);

        self.settlements.push(Settlement {
            settlement_id: Uuid::now_v7(),
            from: settlement.from,
            to: settlement.to,
            amount: settlement.amount,
            status: settlement.status,
            initiated_at: now,
            confirmed_at,
        });

        let recorded = &self.settlements[self.settlements.len() - 1];
        tracing::debug!(
            trip_id = %self.trip_id,
            settlement_id = %recorded.settlement_id,
            status = ?recorded.status,
            "Settlement recorded"
        );
        Ok(recorded)
    }

    /// Mark a pending settlement as confirmed by its receiver
    pub fn confirm_settlement(&mut self, settlement_id: Uuid) -> Result<&Settlement> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.settlement_id == settlement_id)
            .ok_or(Error::SettlementNotFound(settlement_id))?;

        if settlement.status.is_confirmed() {
            return Err(Error::AlreadyConfirmed(settlement_id));
        }

        settlement.status = SettlementStatus::Confirmed;
        settlement.confirmed_at = Some(Utc::now());
        Ok(&*settlement)
    }

    /// Immutable copy of the current state
    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            trip_id: self.trip_id,
            currency: self.currency,
            members: self.members.clone(),
            expenses: self.expenses.clone(),
            settlements: self.settlements.clone(),
        }
    }

    fn expense_index(&self, expense_id: Uuid) -> Result<usize> {
        self.expenses
            .iter()
            .position(|e| e.expense_id == expense_id)
            .ok_or(Error::ExpenseNotFound(expense_id))
    }
}
