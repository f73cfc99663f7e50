use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{
    model::{ExpenseShare, Money, ParticipantId, ShareType, SplitType},
    services::{
        name_matcher::NameMatcher,
        participant_resolver::{ParticipantResolver, ResolveError},
    },
};

/// How an expense total is divided among participants.
///
/// Participants are named by display name or id and resolved against the
/// trip at build time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SplitSpec {
    Equal {
        #[serde(default)]
        participants: Option<Vec<String>>,
        #[serde(default)]
        split_count: Option<usize>,
    },
    Percentage {
        splits: Vec<PercentageSplit>,
    },
    Custom {
        splits: Vec<CustomSplit>,
    },
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentageSplit {
    pub participant: String,
    pub percentage: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomSplit {
    pub participant: String,
    pub amount: Money,
}

impl SplitSpec {
    /// Equal split across every eligible participant.
    pub fn equal_all() -> Self {
        Self::Equal {
            participants: None,
            split_count: None,
        }
    }

    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal { .. } => SplitType::Equal,
            Self::Percentage { .. } => SplitType::Percentage,
            Self::Custom { .. } => SplitType::Custom,
            Self::None => SplitType::None,
        }
    }
}

/// Whether percentage splits must add up to exactly 100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentagePolicy {
    /// Any drift is absorbed by the last entry.
    #[default]
    Lenient,
    Strict,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ShareBuildError {
    #[error("could not resolve participant: {0}")]
    UnresolvedParticipant(#[from] ResolveError),
    #[error("an expense must be split between at least one participant")]
    NoParticipants,
    #[error("custom split amounts add up to {actual} but the expense total is {expected}")]
    CustomTotalMismatch { expected: Money, actual: Money },
    #[error("split percentages add up to {total}% instead of 100%")]
    PercentageTotalMismatch { total: Decimal },
    #[error("share amount is out of range")]
    AmountOutOfRange,
}

/// Builds per-participant share records for a single expense.
///
/// Remainders go to a fixed position in the caller's order (first entry for
/// equal splits, last entry for percentage splits), so callers must pass
/// participants in a stable order to get reproducible shares.
pub struct ShareBuilder<'a, M: NameMatcher + ?Sized> {
    resolver: ParticipantResolver<'a, M>,
    percentage_policy: PercentagePolicy,
}

impl<'a, M: NameMatcher + ?Sized> ShareBuilder<'a, M> {
    pub fn new(resolver: ParticipantResolver<'a, M>) -> Self {
        Self {
            resolver,
            percentage_policy: PercentagePolicy::default(),
        }
    }

    pub fn with_percentage_policy(mut self, policy: PercentagePolicy) -> Self {
        self.percentage_policy = policy;
        self
    }

    pub fn build(
        &self,
        total: Money,
        payer_id: ParticipantId,
        spec: &SplitSpec,
    ) -> Result<Vec<ExpenseShare>, ShareBuildError> {
        let shares = match spec {
            SplitSpec::Equal {
                participants,
                split_count,
            } => {
                let ids = self.equal_participants(participants.as_deref(), *split_count)?;
                split_equally(total, &ids)?
            }
            SplitSpec::Percentage { splits } => self.split_by_percentage(total, splits)?,
            SplitSpec::Custom { splits } => self.split_by_amount(total, splits)?,
            SplitSpec::None => vec![ExpenseShare {
                participant_id: payer_id,
                share_amount: total,
                share_type: ShareType::Amount,
                share_value: Some(total.as_decimal()),
            }],
        };

        debug_assert_eq!(
            Money::checked_sum(shares.iter().map(|share| share.share_amount)),
            Some(total)
        );
        tracing::debug!(
            split_type = ?spec.split_type(),
            total = total.amount(),
            share_count = shares.len(),
            "Expense shares built"
        );

        Ok(shares)
    }

    fn equal_participants(
        &self,
        names: Option<&[String]>,
        split_count: Option<usize>,
    ) -> Result<Vec<ParticipantId>, ShareBuildError> {
        let ids: Vec<ParticipantId> = match (names, split_count) {
            (Some(names), _) if !names.is_empty() => names
                .iter()
                .map(|name| self.resolver.resolve_participant_id(name))
                .collect::<Result<_, _>>()?,
            (_, Some(count)) => self
                .resolver
                .participants()
                .iter()
                .take(count)
                .map(|participant| participant.user_id)
                .collect(),
            _ => self
                .resolver
                .participants()
                .iter()
                .map(|participant| participant.user_id)
                .collect(),
        };

        if ids.is_empty() {
            return Err(ShareBuildError::NoParticipants);
        }
        Ok(ids)
    }

    fn split_by_percentage(
        &self,
        total: Money,
        splits: &[PercentageSplit],
    ) -> Result<Vec<ExpenseShare>, ShareBuildError> {
        let Some((last, leading)) = splits.split_last() else {
            return Err(ShareBuildError::NoParticipants);
        };

        if self.percentage_policy == PercentagePolicy::Strict {
            let percentage_total: Decimal = splits.iter().map(|split| split.percentage).sum();
            if percentage_total != Decimal::ONE_HUNDRED {
                return Err(ShareBuildError::PercentageTotalMismatch {
                    total: percentage_total,
                });
            }
        }

        let mut shares = Vec::with_capacity(splits.len());
        let mut allocated = Money::ZERO;

        for split in leading {
            let participant_id = self.resolver.resolve_participant_id(&split.participant)?;
            let share_amount = percentage_of(total, split.percentage)?;
            allocated = allocated
                .checked_add(share_amount)
                .ok_or(ShareBuildError::AmountOutOfRange)?;
            shares.push(ExpenseShare {
                participant_id,
                share_amount,
                share_type: ShareType::Percentage,
                share_value: Some(split.percentage),
            });
        }

        let participant_id = self.resolver.resolve_participant_id(&last.participant)?;
        let share_amount = total
            .checked_sub(allocated)
            .ok_or(ShareBuildError::AmountOutOfRange)?;
        shares.push(ExpenseShare {
            participant_id,
            share_amount,
            share_type: ShareType::Percentage,
            share_value: Some(last.percentage),
        });

        Ok(shares)
    }

    fn split_by_amount(
        &self,
        total: Money,
        splits: &[CustomSplit],
    ) -> Result<Vec<ExpenseShare>, ShareBuildError> {
        if splits.is_empty() {
            return Err(ShareBuildError::NoParticipants);
        }

        let actual = Money::checked_sum(splits.iter().map(|split| split.amount))
            .ok_or(ShareBuildError::AmountOutOfRange)?;
        if actual != total {
            return Err(ShareBuildError::CustomTotalMismatch {
                expected: total,
                actual,
            });
        }

        splits
            .iter()
            .map(|split| {
                let participant_id = self.resolver.resolve_participant_id(&split.participant)?;
                Ok(ExpenseShare {
                    participant_id,
                    share_amount: split.amount,
                    share_type: ShareType::Amount,
                    share_value: Some(split.amount.as_decimal()),
                })
            })
            .collect()
    }
}

/// Floor division with the remainder assigned to the first participant.
pub fn split_equally(
    total: Money,
    participants: &[ParticipantId],
) -> Result<Vec<ExpenseShare>, ShareBuildError> {
    if participants.is_empty() {
        return Err(ShareBuildError::NoParticipants);
    }

    let count = i64::try_from(participants.len()).map_err(|_| ShareBuildError::AmountOutOfRange)?;
    let base = total.amount().div_euclid(count);
    let remainder = total.amount().rem_euclid(count);

    Ok(participants
        .iter()
        .enumerate()
        .map(|(idx, &participant_id)| {
            let share = if idx == 0 { base + remainder } else { base };
            ExpenseShare {
                participant_id,
                share_amount: Money::from_i64(share),
                share_type: ShareType::Equal,
                share_value: None,
            }
        })
        .collect())
}

fn percentage_of(total: Money, percentage: Decimal) -> Result<Money, ShareBuildError> {
    total
        .as_decimal()
        .checked_mul(percentage)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|share| share.floor().to_i64())
        .map(Money::from_i64)
        .ok_or(ShareBuildError::AmountOutOfRange)
}
