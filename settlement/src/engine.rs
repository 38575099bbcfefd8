//! Main settlement engine
//!
//! Keeps one [`TripLedger`] per trip, routes writes through it, and publishes
//! the refreshed collection to the trip's room afterwards. Reads recompute
//! balances and plans from the current snapshot on every call.

use crate::{
    balances::snapshot_balances,
    config::Config,
    netting::{imbalance, outstanding_transfers, NettingEngine},
    types::*,
    Error, Result,
};
use message_bus::{Publisher, Subscriber, TripUpdate};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use trip_ledger::{
    Currency, Expense, ExpenseUpdate, MemberId, NewExpense, NewSettlement, Settlement,
    TripLedger, TripSnapshot,
};
use uuid::Uuid;

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Loaded trips
    trips: RwLock<HashMap<Uuid, TripLedger>>,

    /// Trip room publisher
    publisher: Publisher,

    /// Netting engine
    netting: NettingEngine,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        let publisher = Publisher::new(config.feed.clone());
        Self::with_publisher(config, publisher)
    }

    /// Create engine publishing through an existing publisher
    pub fn with_publisher(config: Config, publisher: Publisher) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            service = %config.service_name,
            version = %config.service_version,
            policy = %config.policy,
            "Settlement engine ready"
        );

        Ok(Self {
            trips: RwLock::new(HashMap::new()),
            publisher,
            netting: NettingEngine::new(config.netting.tolerance),
            config,
        })
    }

    /// Settlement policy in use
    pub fn policy(&self) -> SettlementPolicy {
        self.config.policy
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Trip room publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Join a trip's room to receive live updates
    pub fn subscribe(&self, trip_id: Uuid) -> Subscriber {
        self.publisher.subscribe(trip_id)
    }

    /// Start tracking a new trip
    pub fn open_trip(
        &self,
        trip_id: Uuid,
        currency: Option<Currency>,
        members: Vec<MemberId>,
    ) -> Result<TripSnapshot> {
        let currency = currency.unwrap_or(self.config.ledger.default_currency);
        let ledger =
            TripLedger::with_config(trip_id, currency, members, self.config.ledger.clone());
        let snapshot = ledger.snapshot();
        self.insert(ledger)?;

        tracing::info!(%trip_id, members = snapshot.members.len(), "Trip opened");
        Ok(snapshot)
    }

    /// Load a trip from a persisted snapshot
    pub fn import_trip(&self, snapshot: TripSnapshot) -> Result<()> {
        let trip_id = snapshot.trip_id;
        self.insert(TripLedger::from_snapshot(snapshot, self.config.ledger.clone()))?;

        tracing::info!(%trip_id, "Trip imported");
        Ok(())
    }

    /// Stop tracking a trip and close its room
    pub fn close_trip(&self, trip_id: Uuid) -> Result<TripSnapshot> {
        let ledger = self
            .trips
            .write()
            .remove(&trip_id)
            .ok_or(Error::TripNotFound(trip_id))?;
        self.publisher.rooms().close(trip_id);

        tracing::info!(%trip_id, "Trip closed");
        Ok(ledger.snapshot())
    }

    /// Add a member to a trip
    pub fn add_member(&self, trip_id: Uuid, member: MemberId) -> Result<Vec<MemberId>> {
        self.write(trip_id, |ledger| {
            let added = ledger.add_member(member);
            let members = ledger.members().to_vec();
            let update = added.then(|| TripUpdate::Members(members.clone()));
            Ok((members, update))
        })
    }

    /// Record an expense; returns the refreshed expense list
    pub fn add_expense(&self, trip_id: Uuid, expense: NewExpense) -> Result<Vec<Expense>> {
        self.write(trip_id, |ledger| {
            let expenses = ledger.add_expense(expense)?.to_vec();
            Ok((expenses.clone(), Some(TripUpdate::Expenses(expenses))))
        })
    }

    /// Partially update an expense
    pub fn update_expense(
        &self,
        trip_id: Uuid,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        self.write(trip_id, |ledger| {
            let expense = ledger.update_expense(expense_id, update)?.clone();
            Ok((expense, Some(TripUpdate::Expenses(ledger.expenses().to_vec()))))
        })
    }

    /// Remove an expense
    pub fn delete_expense(&self, trip_id: Uuid, expense_id: Uuid) -> Result<Expense> {
        self.write(trip_id, |ledger| {
            let expense = ledger.delete_expense(expense_id)?;
            Ok((expense, Some(TripUpdate::Expenses(ledger.expenses().to_vec()))))
        })
    }

    /// Record a settlement payment (pending unless stated otherwise)
    pub fn initiate_settlement(
        &self,
        trip_id: Uuid,
        settlement: NewSettlement,
    ) -> Result<Settlement> {
        self.write(trip_id, |ledger| {
            let settlement = ledger.record_settlement(settlement)?.clone();
            Ok((
                settlement,
                Some(TripUpdate::Settlements(ledger.settlements().to_vec())),
            ))
        })
    }

    /// Confirm receipt of a pending settlement
    pub fn confirm_settlement(&self, trip_id: Uuid, settlement_id: Uuid) -> Result<Settlement> {
        self.write(trip_id, |ledger| {
            let settlement = ledger.confirm_settlement(settlement_id)?.clone();
            Ok((
                settlement,
                Some(TripUpdate::Settlements(ledger.settlements().to_vec())),
            ))
        })
    }

    /// Current snapshot of a trip
    pub fn snapshot(&self, trip_id: Uuid) -> Result<TripSnapshot> {
        self.trips
            .read()
            .get(&trip_id)
            .map(TripLedger::snapshot)
            .ok_or(Error::TripNotFound(trip_id))
    }

    /// Net balance per member
    pub fn balances(&self, trip_id: Uuid) -> Result<BalanceMap> {
        snapshot_balances(&self.snapshot(trip_id)?, self.config.policy)
    }

    /// Suggested payments for a trip
    pub fn payment_plan(&self, trip_id: Uuid) -> Result<Vec<NetTransfer>> {
        let balances = self.balances(trip_id)?;
        self.check_conservation(&balances)?;
        Ok(self.netting.compute_settlement_plan(&balances))
    }

    /// Balances, plan and outstanding payments for a loaded trip
    pub fn summary(&self, trip_id: Uuid) -> Result<TripSummary> {
        self.summarize(&self.snapshot(trip_id)?)
    }

    /// Balances, plan and outstanding payments for any snapshot
    pub fn summarize(&self, snapshot: &TripSnapshot) -> Result<TripSummary> {
        let balances = snapshot_balances(snapshot, self.config.policy)?;
        let imbalance = self.check_conservation(&balances)?;

        let plan = self.netting.compute_settlement_plan(&balances);
        let outstanding = outstanding_transfers(&plan, &snapshot.settlements);
        let stats = self.netting.stats(&balances, &plan);

        tracing::debug!(
            trip_id = %snapshot.trip_id,
            transfers = plan.len(),
            outstanding = outstanding.len(),
            "Trip summarized"
        );

        Ok(TripSummary {
            trip_id: snapshot.trip_id,
            currency: snapshot.currency,
            policy: self.config.policy,
            balances,
            plan,
            outstanding,
            imbalance,
            stats,
        })
    }

    fn insert(&self, ledger: TripLedger) -> Result<()> {
        let trip_id = ledger.trip_id();
        let mut trips = self.trips.write();
        if trips.contains_key(&trip_id) {
            return Err(Error::TripExists(trip_id));
        }
        trips.insert(trip_id, ledger);
        Ok(())
    }

    /// Run a write against one trip, then publish its update outside the lock
    fn write<T, F>(&self, trip_id: Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&mut TripLedger) -> Result<(T, Option<TripUpdate>)>,
    {
        let (value, update) = {
            let mut trips = self.trips.write();
            let ledger = trips.get_mut(&trip_id).ok_or(Error::TripNotFound(trip_id))?;
            f(ledger)?
        };

        if let Some(update) = update {
            tracing::info!(%trip_id, kind = ?update.message_type(), "Trip updated");
            self.publisher.publish_update(trip_id, update);
        }
        Ok(value)
    }

    fn check_conservation(&self, balances: &BalanceMap) -> Result<Decimal> {
        let total = imbalance(balances);
        if self.config.netting.strict_conservation && total.abs() > self.netting.tolerance() {
            return Err(Error::Imbalance { total });
        }
        Ok(total)
    }
}
