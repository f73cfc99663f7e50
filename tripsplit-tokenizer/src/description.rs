use std::sync::LazyLock;

use regex::Regex;

use crate::currency::{CODES, SYMBOLS};

const FALLBACK_DESCRIPTION: &str = "Expense";

// Split and payer vocabulary removed from free-form descriptions.
const STRIPPED_KEYWORDS: &[&str] = &[
    "split", "splitting", "evenly", "equally", "ways", "way", "paid", "pays", "pay", "each",
    "per", "person", "people", "between", "among", "everyone", "owes", "owe", "half",
    "quarter", "shared", "share",
];

fn symbol_class() -> String {
    SYMBOLS.iter().map(|(symbol, _)| *symbol).collect()
}

static TRAILING_PAYMENT: LazyLock<Regex> = LazyLock::new(|| {
    let symbols = regex::escape(&symbol_class());
    let codes = CODES.join("|");
    Regex::new(&format!(
        r"(?i)\s*\b\p{{L}}+\s+paid(?:\s+for)?\s+[{symbols}]?\s?\d[\d.,]*\s?[{symbols}]?(?:\s*\b(?:{codes})\b)?\s*[.!]?\s*$"
    ))
    .expect("trailing payment pattern")
});

static STRIPPABLE: LazyLock<Regex> = LazyLock::new(|| {
    let symbols = regex::escape(&symbol_class());
    let codes = CODES.join("|");
    let keywords = STRIPPED_KEYWORDS.join("|");
    Regex::new(&format!(
        r"(?i)[{symbols}]|\b(?:{codes})\b|\d+(?:[.,]\d+)*\s*%?|\b(?:{keywords})\b"
    ))
    .expect("strippable pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Short human description of the expense.
///
/// A trailing "<payer> paid <amount>" clause is cut off and the text before
/// it kept as written. Otherwise amounts, currencies and split vocabulary are
/// removed from the whole text.
pub fn extract_description(text: &str) -> String {
    if let Some(clause) = TRAILING_PAYMENT.find(text) {
        let before = text[..clause.start()].trim();
        if !before.is_empty() {
            return before.to_string();
        }
    }

    let stripped = STRIPPABLE.replace_all(text, " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let trimmed = collapsed.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());

    if trimmed.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::trailing_clause("Dinner at Luigi's. Alice paid $60", "Dinner at Luigi's.")]
    #[case::trailing_clause_with_code("Cable car tickets, bob paid 45 CHF.", "Cable car tickets,")]
    #[case::trailing_paid_for("Boat tour Sam paid for 120", "Boat tour")]
    #[case::stripped("Dinner $60.50 split 3 ways", "Dinner")]
    #[case::stripped_codes("Taxi 25 EUR between us", "Taxi us")]
    #[case::percentages("Hotel: Alice 60%, Bob 40%", "Hotel: Alice , Bob")]
    #[case::only_noise("$40 split evenly", "Expense")]
    #[case::payer_only("Alice paid $60", "Alice")]
    #[case::empty("", "Expense")]
    fn extracts_description(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(extract_description(text), expected);
    }
}
