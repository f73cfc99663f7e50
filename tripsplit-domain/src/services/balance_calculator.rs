use crate::model::{Balance, Expense, MemberBalances, Money, ParticipantId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("balances sum to {0} instead of zero")]
    ImbalancedTotal(Money),
    #[error("balance of {0} is out of range")]
    AmountOutOfRange(ParticipantId),
}

/// Aggregates expenses into net balances.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Net balance per participant: paid amounts minus owed shares.
    ///
    /// All expenses must already be expressed in one currency. Balances are
    /// seeded in `participants` order; payers or share holders missing from
    /// it are appended in first-seen order.
    pub fn calculate(
        &self,
        participants: &[ParticipantId],
        expenses: &[Expense],
    ) -> Result<MemberBalances, BalanceError> {
        let mut balances: MemberBalances = participants
            .iter()
            .map(|&participant| (participant, Money::ZERO))
            .collect();

        for expense in expenses {
            credit(&mut balances, expense.payer_id, expense.amount)?;
            for share in &expense.shares {
                let owed = share
                    .share_amount
                    .checked_neg()
                    .ok_or(BalanceError::AmountOutOfRange(share.participant_id))?;
                credit(&mut balances, share.participant_id, owed)?;
            }
        }

        let total = net_total(&balances);
        if !total.is_zero() {
            let unbalanced_expenses = expenses
                .iter()
                .filter(|expense| !expense.is_balanced())
                .count();
            tracing::error!(
                total = total.amount(),
                participant_count = balances.len(),
                expense_count = expenses.len(),
                unbalanced_expenses,
                "Balance aggregation violated conservation"
            );
            return Err(BalanceError::ImbalancedTotal(total));
        }

        Ok(balances)
    }
}

/// Sum of all balances, clamped to the `i64` range.
///
/// Accumulates in `i128` so large balances that offset each other never
/// overflow midway.
pub(crate) fn net_total(balances: &MemberBalances) -> Money {
    let total: i128 = balances
        .values()
        .map(|amount| i128::from(amount.amount()))
        .sum();
    let clamped = i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
    Money::from_i64(clamped)
}

fn credit(
    balances: &mut MemberBalances,
    participant: ParticipantId,
    amount: Money,
) -> Result<(), BalanceError> {
    let balance = balances.entry(participant).or_insert(Money::ZERO);
    *balance = balance
        .checked_add(amount)
        .ok_or(BalanceError::AmountOutOfRange(participant))?;
    Ok(())
}

/// Flattens balances into records, keeping iteration order.
pub fn to_balance_list(balances: &MemberBalances) -> Vec<Balance> {
    balances
        .iter()
        .map(|(&participant_id, &amount)| Balance {
            participant_id,
            amount,
        })
        .collect()
}
