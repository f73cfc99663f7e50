use serde::Serialize;

use crate::text::{char_offset, words};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyMatch {
    pub currency: &'static str,
    /// Character offset of the symbol or code.
    pub position: usize,
}

pub(crate) const SYMBOLS: &[(&str, &str)] = &[
    ("€", "EUR"),
    ("$", "USD"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₣", "CHF"),
];

pub(crate) const CODES: &[&str] = &[
    "CHF", "EUR", "USD", "GBP", "JPY", "INR", "AUD", "CAD", "NZD", "SGD", "HKD", "CNY", "KRW",
    "THB", "MXN", "BRL", "SEK", "NOK", "DKK", "ZAR",
];

/// First currency found, scanning the symbol table before the code table.
///
/// Entries are tried in table order and the first entry present in the
/// text wins, even when another currency appears earlier in the text.
pub fn extract_currency(text: &str) -> Option<CurrencyMatch> {
    let from_symbols = SYMBOLS.iter().find_map(|&(symbol, currency)| {
        text.find(symbol).map(|byte_idx| CurrencyMatch {
            currency,
            position: char_offset(text, byte_idx),
        })
    });
    if from_symbols.is_some() {
        return from_symbols;
    }

    CODES.iter().find_map(|&code| {
        words(text)
            .find(|(word, _)| word.eq_ignore_ascii_case(code))
            .map(|(_, range)| CurrencyMatch {
                currency: code,
                position: char_offset(text, range.start),
            })
    })
}
