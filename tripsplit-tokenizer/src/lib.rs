#![warn(clippy::uninlined_format_args)]

//! Best-effort extraction of expense fields from free text.
//!
//! Every function here is total: a miss is `None`, an empty `Vec`, or a
//! fallback string. Results are hints for a confirm step, never validated
//! data.

mod amount;
mod category;
mod currency;
mod description;
mod people;
mod split;
mod text;

pub use amount::{AmountMatch, DecimalFormat, extract_amount};
pub use category::{Category, CategoryMatch, infer_category};
pub use currency::{CurrencyMatch, extract_currency};
pub use description::extract_description;
pub use people::{extract_names, extract_payer};
pub use split::{DetectedSplit, detect_split_type, extract_split_count};

use serde::Serialize;

/// Everything the extractors found in one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseHints {
    pub amount: Option<AmountMatch>,
    pub currency: Option<CurrencyMatch>,
    pub split_count: Option<u32>,
    pub names: Vec<String>,
    pub payer: Option<String>,
    pub split_type: DetectedSplit,
    pub category: Option<CategoryMatch>,
    pub description: String,
}

pub fn tokenize(text: &str, format: DecimalFormat) -> ExpenseHints {
    ExpenseHints {
        amount: extract_amount(text, format),
        currency: extract_currency(text),
        split_count: extract_split_count(text),
        names: extract_names(text),
        payer: extract_payer(text),
        split_type: detect_split_type(text),
        category: infer_category(text),
        description: extract_description(text),
    }
}
