//! Currency normalisation ahead of balance aggregation.
//!
//! Rates are captured when an expense is saved and stored as an
//! [`FxSnapshot`]; conversion never looks up live rates.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::model::{CurrencyCode, Expense, ExpenseShare, Money};

/// Rate captured at save time: one major unit of `from` buys `rate` major
/// units of `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxSnapshot {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FxError {
    #[error("no exchange rate recorded from {from} to {to}")]
    MissingRate { from: CurrencyCode, to: CurrencyCode },
    #[error("rate converts {snapshot_from}->{snapshot_to}, expected {from}->{to}")]
    CurrencyMismatch {
        from: CurrencyCode,
        to: CurrencyCode,
        snapshot_from: CurrencyCode,
        snapshot_to: CurrencyCode,
    },
    #[error("exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),
    #[error("converted amount is out of range")]
    OutOfRange,
}

impl FxSnapshot {
    fn check(&self, from: CurrencyCode, to: CurrencyCode) -> Result<(), FxError> {
        if self.from != from || self.to != to {
            return Err(FxError::CurrencyMismatch {
                from,
                to,
                snapshot_from: self.from,
                snapshot_to: self.to,
            });
        }
        if self.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(self.rate));
        }
        Ok(())
    }
}

/// Converts minor units of `snapshot.from` into minor units of `snapshot.to`,
/// rounding half away from zero.
pub fn convert_amount(amount: Money, snapshot: &FxSnapshot) -> Result<Money, FxError> {
    let rescaled = amount
        .as_decimal()
        .checked_mul(snapshot.rate)
        .and_then(|scaled| scaled.checked_mul(snapshot.to.minor_unit_scale()))
        .and_then(|scaled| scaled.checked_div(snapshot.from.minor_unit_scale()))
        .ok_or(FxError::OutOfRange)?;

    rescaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_i64)
        .ok_or(FxError::OutOfRange)
}

/// Converts each share independently and assigns the rounding residue to the
/// first share, so the result sums exactly to `converted_total`.
pub fn convert_shares(
    shares: &[ExpenseShare],
    converted_total: Money,
    snapshot: &FxSnapshot,
) -> Result<Vec<ExpenseShare>, FxError> {
    let mut converted = shares
        .iter()
        .map(|share| {
            Ok(ExpenseShare {
                share_amount: convert_amount(share.share_amount, snapshot)?,
                ..share.clone()
            })
        })
        .collect::<Result<Vec<_>, FxError>>()?;

    let residue = Money::checked_sum(converted.iter().map(|share| share.share_amount))
        .and_then(|converted_sum| converted_total.checked_sub(converted_sum))
        .ok_or(FxError::OutOfRange)?;
    if let Some(first) = converted.first_mut() {
        first.share_amount = first
            .share_amount
            .checked_add(residue)
            .ok_or(FxError::OutOfRange)?;
    }

    Ok(converted)
}

/// Restates an expense in `target`. Expenses already in `target` are returned
/// unchanged and need no snapshot.
pub fn convert_expense(
    expense: &Expense,
    target: CurrencyCode,
    snapshot: Option<&FxSnapshot>,
) -> Result<Expense, FxError> {
    if expense.currency == target {
        return Ok(expense.clone());
    }

    let snapshot = snapshot.ok_or(FxError::MissingRate {
        from: expense.currency,
        to: target,
    })?;
    snapshot.check(expense.currency, target)?;

    let amount = convert_amount(expense.amount, snapshot)?;
    let shares = convert_shares(&expense.shares, amount, snapshot)?;

    tracing::debug!(
        expense_id = %expense.id,
        from = %expense.currency,
        to = %target,
        rate = %snapshot.rate,
        original = expense.amount.amount(),
        converted = amount.amount(),
        "Expense converted to trip currency"
    );

    Ok(Expense {
        amount,
        currency: target,
        shares,
        ..expense.clone()
    })
}
