//! Amount and split validation
//!
//! Every expense write goes through [`validate_split`]: the per-member shares
//! must add up to the expense total within [`SPLIT_TOLERANCE`]. Mismatches are
//! reported with both totals and never corrected silently.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use trip_ledger::{validate_split, Error, SplitDetail};
//!
//! let ok = [
//!     SplitDetail::new("a", Decimal::from(50)),
//!     SplitDetail::new("b", Decimal::from(50)),
//! ];
//! assert!(validate_split(Decimal::from(100), &ok).is_ok());
//!
//! let short = [
//!     SplitDetail::new("a", Decimal::from(40)),
//!     SplitDetail::new("b", Decimal::from(50)),
//! ];
//! match validate_split(Decimal::from(100), &short) {
//!     Err(Error::SplitMismatch { expected, actual }) => {
//!         assert_eq!(expected, Decimal::from(100));
//!         assert_eq!(actual, Decimal::from(90));
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use crate::{
    types::{Currency, MemberId, SplitDetail},
    Error, Result,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest accepted difference between an expense amount and its split total
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Check that split shares add up to `amount` within [`SPLIT_TOLERANCE`]
pub fn validate_split(amount: Decimal, splits: &[SplitDetail]) -> Result<()> {
    validate_split_with_tolerance(amount, splits, SPLIT_TOLERANCE)
}

/// Check that split shares add up to `amount` within `tolerance`
pub fn validate_split_with_tolerance(
    amount: Decimal,
    splits: &[SplitDetail],
    tolerance: Decimal,
) -> Result<()> {
    let actual = checked_sum("Split total", splits.iter().map(|s| s.owes))?;

    if (actual - amount).abs() > tolerance {
        return Err(Error::SplitMismatch {
            expected: amount,
            actual,
        });
    }

    Ok(())
}

/// Sum amounts, failing instead of overflowing
pub fn checked_sum(what: &str, amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| Error::InvalidAmount(format!("{} is out of range", what)))
}

/// Reject negative amounts
pub fn ensure_non_negative(what: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "{} must not be negative, got {}",
            what, amount
        )));
    }
    Ok(())
}

/// Reject zero or negative amounts
pub fn ensure_positive(what: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "{} must be positive, got {}",
            what, amount
        )));
    }
    Ok(())
}

/// Validate an expense's amounts and split before it is recorded
pub fn validate_expense(amount: Decimal, splits: &[SplitDetail], tolerance: Decimal) -> Result<()> {
    ensure_non_negative("Expense amount", amount)?;
    for split in splits {
        ensure_non_negative(&format!("Share of {}", split.member), split.owes)?;
    }
    validate_split_with_tolerance(amount, splits, tolerance)
}

/// Split `amount` equally between `members`
///
/// Shares are rounded down to the currency's minor unit; the leftover minor
/// units go one each to the first members in the given order, so the shares
/// always sum to exactly `amount`.
pub fn split_equally(
    amount: Decimal,
    members: &[MemberId],
    currency: Currency,
) -> Result<Vec<SplitDetail>> {
    if members.is_empty() {
        return Err(Error::EmptySplit);
    }
    ensure_non_negative("Expense amount", amount)?;

    let count = Decimal::from(members.len());
    let unit = currency.minor_unit();
    let base = (amount / count)
        .round_dp_with_strategy(currency.minor_units(), RoundingStrategy::ToZero);

    let remainder = amount - base * count;
    let extra_units = (remainder / unit).trunc().to_usize().unwrap_or(0);
    // Sub-minor-unit residue only appears when `amount` is finer than the currency
    let residue = remainder - unit * Decimal::from(extra_units);

    let mut shares: Vec<SplitDetail> = members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let owes = if i < extra_units { base + unit } else { base };
            SplitDetail::new(member.clone(), owes)
        })
        .collect();

    if let Some(first) = shares.first_mut() {
        first.owes += residue;
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(ids: &[&str]) -> Vec<MemberId> {
        ids.iter().map(|id| MemberId::new(*id)).collect()
    }

    #[test]
    fn test_tolerance_constant() {
        assert_eq!(SPLIT_TOLERANCE, Decimal::new(1, 2));
    }

    #[test]
    fn test_split_within_tolerance() {
        // 33.33 * 3 = 99.99, off by exactly one cent
        let splits = vec![
            SplitDetail::new("a", Decimal::new(3333, 2)),
            SplitDetail::new("b", Decimal::new(3333, 2)),
            SplitDetail::new("c", Decimal::new(3333, 2)),
        ];
        assert!(validate_split(Decimal::from(100), &splits).is_ok());
    }

    #[test]
    fn test_split_mismatch_reports_totals() {
        let splits = vec![
            SplitDetail::new("a", Decimal::from(40)),
            SplitDetail::new("b", Decimal::from(50)),
        ];

        let err = validate_split(Decimal::from(100), &splits).unwrap_err();
        match err {
            Error::SplitMismatch { expected, actual } => {
                assert_eq!(expected, Decimal::from(100));
                assert_eq!(actual, Decimal::from(90));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_split_over_allocated() {
        let splits = vec![SplitDetail::new("a", Decimal::new(10002, 2))];
        assert!(validate_split(Decimal::from(100), &splits).is_err());
    }

    #[test]
    fn test_split_total_out_of_range() {
        let splits = vec![
            SplitDetail::new("a", Decimal::MAX),
            SplitDetail::new("b", Decimal::MAX),
        ];
        let err = validate_split(Decimal::MAX, &splits).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));

        let err = validate_expense(Decimal::MAX, &splits, SPLIT_TOLERANCE).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_expense_rejects_negative_share() {
        let splits = vec![
            SplitDetail::new("a", Decimal::from(150)),
            SplitDetail::new("b", Decimal::from(-50)),
        ];
        let err = validate_expense(Decimal::from(100), &splits, SPLIT_TOLERANCE).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
        assert!(err.to_string().contains("Share of b"));
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("Settlement amount", Decimal::ONE).is_ok());
        assert!(ensure_positive("Settlement amount", Decimal::ZERO).is_err());
        assert!(ensure_non_negative("Expense amount", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_split_equally_distributes_remainder() {
        let shares = split_equally(Decimal::from(100), &members(&["a", "b", "c"]), Currency::USD)
            .unwrap();

        assert_eq!(shares[0].owes, Decimal::new(3334, 2));
        assert_eq!(shares[1].owes, Decimal::new(3333, 2));
        assert_eq!(shares[2].owes, Decimal::new(3333, 2));
        assert_eq!(shares.iter().map(|s| s.owes).sum::<Decimal>(), Decimal::from(100));
    }

    #[test]
    fn test_split_equally_zero_decimal_currency() {
        let shares = split_equally(Decimal::from(1000), &members(&["a", "b", "c"]), Currency::JPY)
            .unwrap();

        assert_eq!(shares[0].owes, Decimal::from(334));
        assert_eq!(shares[1].owes, Decimal::from(333));
        assert_eq!(shares[2].owes, Decimal::from(333));
    }

    #[test]
    fn test_split_equally_sub_unit_amount() {
        let amount = Decimal::new(10005, 3); // 10.005
        let shares = split_equally(amount, &members(&["a", "b"]), Currency::USD).unwrap();
        assert_eq!(shares.iter().map(|s| s.owes).sum::<Decimal>(), amount);
    }

    #[test]
    fn test_split_equally_empty() {
        let result = split_equally(Decimal::from(10), &[], Currency::USD);
        assert!(matches!(result, Err(Error::EmptySplit)));
    }
}
