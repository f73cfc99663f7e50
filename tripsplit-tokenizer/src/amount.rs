use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::char_offset;

/// Which characters separate thousands and decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalFormat {
    /// `1,234.56`
    #[default]
    Us,
    /// `1.234,56`
    Eu,
}

impl DecimalFormat {
    fn separators(self) -> (char, char) {
        match self {
            Self::Us => (',', '.'),
            Self::Eu => ('.', ','),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountMatch {
    pub amount: f64,
    /// Character offset of the match, including a leading currency symbol.
    pub position: usize,
}

const SYMBOL_PREFIX: &str = r"(?:[€$£¥₹₣]\s?)?";

// Most specific first: thousands+decimal, thousands only, decimal only, integer.
fn patterns(grouping: &str, decimal: &str) -> Vec<Regex> {
    [
        format!(r"[0-9]{{1,3}}(?:{grouping}[0-9]{{3}})+{decimal}[0-9]+"),
        format!(r"[0-9]{{1,3}}(?:{grouping}[0-9]{{3}})+"),
        format!(r"[0-9]+{decimal}[0-9]+"),
        r"[0-9]+".to_string(),
    ]
    .iter()
    .map(|number| {
        Regex::new(&format!(r"{SYMBOL_PREFIX}\b(?P<number>{number})\b"))
            .expect("amount pattern")
    })
    .collect()
}

static US_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| patterns(",", r"\."));
static EU_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| patterns(r"\.", ","));

/// Amount written in `format`, taken from the most specific pattern that
/// matches anywhere in the text.
pub fn extract_amount(text: &str, format: DecimalFormat) -> Option<AmountMatch> {
    let patterns = match format {
        DecimalFormat::Us => &*US_PATTERNS,
        DecimalFormat::Eu => &*EU_PATTERNS,
    };
    let (grouping, decimal) = format.separators();

    patterns.iter().find_map(|pattern| {
        let captures = pattern.captures(text)?;
        let whole = captures.get(0)?;
        let normalized: String = captures
            .name("number")?
            .as_str()
            .chars()
            .filter(|&c| c != grouping)
            .map(|c| if c == decimal { '.' } else { c })
            .collect();
        let amount = normalized.parse::<f64>().ok()?;
        Some(AmountMatch {
            amount,
            position: char_offset(text, whole.start()),
        })
    })
}
