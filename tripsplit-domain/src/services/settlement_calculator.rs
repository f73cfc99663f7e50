use crate::{
    model::{MemberBalances, Money, ParticipantId, Transfer},
    services::balance_calculator::net_total,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("balances sum to {0} instead of zero")]
    ImbalancedTotal(Money),
    #[error("debt of {0} is out of range")]
    AmountOutOfRange(ParticipantId),
}

/// Greedy largest-debtor-pays-largest-creditor settlement.
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Transfers that bring every balance to zero.
    ///
    /// Greedy: the largest remaining debtor always pays the largest remaining
    /// creditor. Ties go to whoever appears first in `balances`, so the result
    /// only depends on the map's iteration order. Each transfer clears at least
    /// one side, which bounds the result to `n - 1` transfers.
    pub fn calculate(&self, balances: &MemberBalances) -> Result<Vec<Transfer>, SettlementError> {
        let total = net_total(balances);
        if !total.is_zero() {
            tracing::error!(
                total = total.amount(),
                participant_count = balances.len(),
                "Cannot settle balances that do not sum to zero"
            );
            return Err(SettlementError::ImbalancedTotal(total));
        }

        let mut debtors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, amount)| amount.is_negative())
            .map(|(&id, &amount)| {
                amount
                    .checked_neg()
                    .map(|owed| (id, owed))
                    .ok_or(SettlementError::AmountOutOfRange(id))
            })
            .collect::<Result<_, _>>()?;
        let mut creditors: Vec<(ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, amount)| amount.is_positive())
            .map(|(&id, &amount)| (id, amount))
            .collect();

        let mut transfers = Vec::new();
        while let (Some(debtor_idx), Some(creditor_idx)) =
            (largest_open(&debtors), largest_open(&creditors))
        {
            let (from, owed) = debtors[debtor_idx];
            let (to, due) = creditors[creditor_idx];
            let amount = owed.min(due);

            debtors[debtor_idx].1 -= amount;
            creditors[creditor_idx].1 -= amount;
            transfers.push(Transfer { from, to, amount });
        }

        debug_assert!(debtors.iter().all(|(_, amount)| amount.is_zero()));
        debug_assert!(creditors.iter().all(|(_, amount)| amount.is_zero()));
        tracing::debug!(
            participant_count = balances.len(),
            transfer_count = transfers.len(),
            "Settlement computed"
        );

        Ok(transfers)
    }
}

// Index of the largest non-zero amount; the earliest entry wins ties.
fn largest_open(entries: &[(ParticipantId, Money)]) -> Option<usize> {
    let mut best: Option<(usize, Money)> = None;
    for (idx, &(_, amount)) in entries.iter().enumerate() {
        if amount.is_zero() {
            continue;
        }
        if best.is_none_or(|(_, current)| amount > current) {
            best = Some((idx, amount));
        }
    }
    best.map(|(idx, _)| idx)
}
