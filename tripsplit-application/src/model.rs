use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_domain::{
    Balance, CurrencyCode, ExpenseCategory, ItineraryMetadata, Money, Settlement,
    TripParticipant, services::SplitSpec,
};
use tripsplit_tokenizer::DetectedSplit;
use uuid::Uuid;

/// A trip as loaded from storage: participants in a stable order plus the
/// raw expense records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub name: String,
    pub currency: CurrencyCode,
    pub participants: Vec<TripParticipant>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

/// An expense as entered, before payer resolution and share construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    /// Payer name or id; the trip's default payer when absent.
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default = "SplitSpec::equal_all")]
    pub split: SplitSpec,
    /// Rate into the trip currency captured when the expense was saved.
    #[serde(default)]
    pub fx_rate: Option<Decimal>,
    #[serde(default)]
    pub metadata: Option<ItineraryMetadata>,
}

impl ExpenseRecord {
    /// Explicit category, else the one implied by the itinerary metadata.
    pub fn resolved_category(&self) -> ExpenseCategory {
        self.category
            .or_else(|| self.metadata.as_ref().map(ItineraryMetadata::expense_category))
            .unwrap_or_default()
    }
}

/// Something the ledger recovered from instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerWarning {
    PayerDefaulted {
        index: usize,
        requested: String,
        reason: String,
    },
    ExpenseSkipped {
        index: usize,
        reason: String,
    },
    DuplicateExpense {
        index: usize,
        id: Uuid,
    },
}

impl fmt::Display for LedgerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayerDefaulted {
                index,
                requested,
                reason,
            } => write!(
                f,
                "expense #{index}: payer '{requested}' not used ({reason}); charged to the default payer"
            ),
            Self::ExpenseSkipped { index, reason } => {
                write!(f, "expense #{index} skipped: {reason}")
            }
            Self::DuplicateExpense { index, id } => {
                write!(f, "expense #{index} skipped: id {id} already recorded")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSummary {
    pub currency: CurrencyCode,
    pub total_spent: Money,
    pub expense_count: usize,
    pub balances: Vec<Balance>,
    pub settlements: Vec<Settlement>,
    pub warnings: Vec<LedgerWarning>,
}

/// Pre-filled expense form produced from free text, awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Option<Money>,
    pub currency: CurrencyCode,
    pub payer: Option<String>,
    pub participants: Vec<String>,
    pub split_type: DetectedSplit,
    /// Only equal splits can be suggested without per-person values.
    pub split: Option<SplitSpec>,
    pub category: ExpenseCategory,
    pub category_confidence: Option<f64>,
}
