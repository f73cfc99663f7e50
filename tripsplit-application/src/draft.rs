use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use tripsplit_domain::{CurrencyCode, ExpenseCategory, Money, services::SplitSpec};
use tripsplit_tokenizer::{Category, DetectedSplit, tokenize};

use crate::{config::LedgerConfig, model::ExpenseDraft};

/// Turns quick-add text into an [`ExpenseDraft`] for a confirm step.
pub struct DraftBuilder<'a> {
    config: &'a LedgerConfig,
}

impl<'a> DraftBuilder<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, text: &str) -> ExpenseDraft {
        let hints = tokenize(text, self.config.decimal_format);

        let currency = hints
            .currency
            .and_then(|found| found.currency.parse::<CurrencyCode>().ok())
            .unwrap_or(self.config.default_currency);
        let amount = hints.amount.and_then(|found| {
            let minor = to_minor_units(found.amount, currency);
            if minor.is_none() {
                tracing::warn!(amount = found.amount, %currency, "Ignoring unrepresentable amount");
            }
            minor
        });

        let split_type = hints.split_type.normalize();
        let split = (split_type == DetectedSplit::Equal).then(|| SplitSpec::Equal {
            participants: (!hints.names.is_empty()).then(|| hints.names.clone()),
            split_count: hints.split_count.map(|count| count as usize),
        });

        let (category, category_confidence) = match hints.category {
            Some(found) => (expense_category(found.category), Some(found.confidence)),
            None => (ExpenseCategory::Other, None),
        };

        tracing::debug!(
            has_amount = amount.is_some(),
            %currency,
            split_type = ?split_type,
            name_count = hints.names.len(),
            "Expense draft built"
        );

        ExpenseDraft {
            description: hints.description,
            amount,
            currency,
            payer: hints.payer,
            participants: hints.names,
            split_type,
            split,
            category,
            category_confidence,
        }
    }
}

fn expense_category(category: Category) -> ExpenseCategory {
    match category {
        Category::Food => ExpenseCategory::Food,
        Category::Transport => ExpenseCategory::Transport,
        Category::Accommodation => ExpenseCategory::Accommodation,
        Category::Activities => ExpenseCategory::Activities,
        Category::Shopping => ExpenseCategory::Shopping,
    }
}

/// Major-unit amount to minor units of `currency`, rounding half away from zero.
pub fn to_minor_units(amount: f64, currency: CurrencyCode) -> Option<Money> {
    Decimal::try_from(amount)
        .ok()?
        .checked_mul(currency.minor_unit_scale())?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_i64)
}
