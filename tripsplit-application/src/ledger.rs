use fxhash::FxHashSet;
use tripsplit_domain::{
    CurrencyCode, Expense, Money, ParticipantId, ParticipantRole, TripParticipant,
    services::{
        BalanceCalculator, FxSnapshot, NameMatcher, ParticipantResolver, SettlementCalculator,
        ShareBuilder, convert_expense, to_balance_list,
    },
};
use uuid::Uuid;

use crate::{
    config::LedgerConfig,
    error::LedgerError,
    model::{ExpenseRecord, LedgerWarning, SettlementSummary},
};

/// An expense ready for aggregation, in the trip currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedExpense {
    pub expense: Expense,
    pub warnings: Vec<LedgerWarning>,
}

/// Turns expense records into balances and settlement suggestions for one
/// trip.
///
/// `participants` must come in a stable order (join date or id): remainders
/// and settlement ties are decided by position.
pub struct TripLedger<'a> {
    participants: &'a [TripParticipant],
    currency: CurrencyCode,
    matcher: &'a dyn NameMatcher,
    config: LedgerConfig,
    default_payer_id: ParticipantId,
}

impl<'a> TripLedger<'a> {
    /// The default payer is the first owner, or the first participant who can
    /// hold shares when the trip has no owner listed.
    pub fn new(
        participants: &'a [TripParticipant],
        currency: CurrencyCode,
        matcher: &'a dyn NameMatcher,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let default_payer = participants
            .iter()
            .find(|participant| participant.role == ParticipantRole::Owner)
            .or_else(|| {
                participants
                    .iter()
                    .find(|participant| participant.role.can_hold_shares())
            })
            .ok_or(LedgerError::NoParticipants)?;

        Ok(Self {
            participants,
            currency,
            matcher,
            config,
            default_payer_id: default_payer.user_id,
        })
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn default_payer_id(&self) -> ParticipantId {
        self.default_payer_id
    }

    /// Resolves the payer, builds shares among the participants eligible on
    /// the expense date and restates everything in the trip currency.
    ///
    /// An unresolvable payer falls back to the default payer and is reported
    /// as a warning; share and currency problems are errors.
    pub fn prepare_expense(
        &self,
        index: usize,
        record: &ExpenseRecord,
    ) -> Result<PreparedExpense, LedgerError> {
        let mut warnings = Vec::new();

        let payers = self.shareholders(|_| true);
        let payer_resolver = ParticipantResolver::new(&payers, self.matcher)
            .with_threshold(self.config.match_threshold);
        let payer = payer_resolver.resolve_payer(record.payer.as_deref(), self.default_payer_id);
        if let (Some(requested), Some(error)) = (record.payer.as_deref(), payer.error) {
            warnings.push(LedgerWarning::PayerDefaulted {
                index,
                requested: requested.to_string(),
                reason: error.to_string(),
            });
        }

        let eligible = self.shareholders(|participant| participant.is_member_on(record.date));
        let share_resolver = ParticipantResolver::new(&eligible, self.matcher)
            .with_threshold(self.config.match_threshold);
        let shares = ShareBuilder::new(share_resolver)
            .with_percentage_policy(self.config.percentage_policy)
            .build(record.amount, payer.payer_id, &record.split)
            .map_err(|source| LedgerError::Shares { index, source })?;

        let expense = Expense {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            amount: record.amount,
            currency: record.currency,
            payer_id: payer.payer_id,
            date: record.date,
            category: record.resolved_category(),
            split_type: record.split.split_type(),
            shares,
        };

        let snapshot = record.fx_rate.map(|rate| FxSnapshot {
            from: record.currency,
            to: self.currency,
            rate,
        });
        let expense = convert_expense(&expense, self.currency, snapshot.as_ref())
            .map_err(|source| LedgerError::Currency { index, source })?;

        Ok(PreparedExpense { expense, warnings })
    }

    /// Balances and suggested settlements over every usable record.
    ///
    /// Records that cannot be turned into shares are skipped with a warning
    /// so one bad entry does not hide the rest of the trip.
    pub fn summarize(&self, records: &[ExpenseRecord]) -> Result<SettlementSummary, LedgerError> {
        let mut warnings = Vec::new();
        let mut expenses = Vec::with_capacity(records.len());
        let mut seen_ids: FxHashSet<Uuid> = FxHashSet::default();

        for (index, record) in records.iter().enumerate() {
            if let Some(id) = record.id
                && !seen_ids.insert(id)
            {
                tracing::warn!(index, %id, "Skipping duplicate expense record");
                warnings.push(LedgerWarning::DuplicateExpense { index, id });
                continue;
            }

            match self.prepare_expense(index, record) {
                Ok(prepared) => {
                    warnings.extend(prepared.warnings);
                    expenses.push(prepared.expense);
                }
                Err(err @ (LedgerError::Shares { .. } | LedgerError::Currency { .. })) => {
                    tracing::warn!(index, error = %err, "Skipping expense that cannot be split");
                    warnings.push(LedgerWarning::ExpenseSkipped {
                        index,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        let member_ids: Vec<ParticipantId> = self
            .shareholders(|_| true)
            .iter()
            .map(|participant| participant.user_id)
            .collect();
        let balances = BalanceCalculator.calculate(&member_ids, &expenses)?;
        let transfers = SettlementCalculator.calculate(&balances)?;

        let total_spent = Money::checked_sum(expenses.iter().map(|expense| expense.amount))
            .ok_or(LedgerError::TotalOutOfRange)?;
        tracing::info!(
            currency = %self.currency,
            expense_count = expenses.len(),
            skipped = records.len() - expenses.len(),
            transfer_count = transfers.len(),
            total_spent = total_spent.amount(),
            "Trip summarized"
        );

        Ok(SettlementSummary {
            currency: self.currency,
            total_spent,
            expense_count: expenses.len(),
            balances: to_balance_list(&balances),
            settlements: transfers
                .into_iter()
                .map(|transfer| transfer.in_currency(self.currency))
                .collect(),
            warnings,
        })
    }

    // Participants who can hold shares and pass `filter`, in trip order.
    fn shareholders(&self, filter: impl Fn(&TripParticipant) -> bool) -> Vec<TripParticipant> {
        self.participants
            .iter()
            .filter(|participant| participant.role.can_hold_shares() && filter(participant))
            .cloned()
            .collect()
    }
}
