use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SPLIT_COUNT_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"(?i)\b(\d+)[\s-]*ways?\b",
        r"(?i)\bsplit\s+(?:it\s+|this\s+)?(?:by\s+|in\s+|into\s+)?(\d+)\b",
        r"(?i)\bbetween\s+(?:the\s+)?(\d+)\b",
        r"(?i)\b(?:among|for)\s+(?:the\s+)?(\d+)\s+(?:people|persons|friends|guys|of\s+us)\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("split count pattern"))
});

/// Number of people the text says to split between, when in `1..=99`.
///
/// Patterns are tried in order; a pattern whose number is out of range is
/// skipped rather than ending the search.
pub fn extract_split_count(text: &str) -> Option<u32> {
    SPLIT_COUNT_PATTERNS.iter().find_map(|pattern| {
        let count: u32 = pattern.captures(text)?.get(1)?.as_str().parse().ok()?;
        (1..100).contains(&count).then_some(count)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedSplit {
    Equal,
    Custom,
    Percentage,
    Shares,
    None,
}

impl DetectedSplit {
    /// Folds `Shares` into `Percentage`; share-based splits are entered as
    /// percentages downstream.
    pub fn normalize(self) -> Self {
        match self {
            Self::Shares => Self::Percentage,
            other => other,
        }
    }
}

static EQUAL_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"split\s+(?:it\s+|this\s+|the\s+bill\s+)?(?:evenly|equally)",
        r"|(?:evenly|equally)\s+(?:split|divided|shared)",
        r"|split\s+(?:it\s+)?(?:in\s+half|down\s+the\s+middle)",
        r"|\d+[\s-]*ways?",
        r"|50\s*/\s*50|fifty[\s-]fifty",
        r"|go(?:ing)?\s+dutch",
        r"|same\s+amount",
        r")\b",
    ))
    .expect("equal split pattern")
});

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?\s*%").expect("percent pattern"));

static OWN_SHARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\beach\s+pays?\s+(?:their|his|her|my|our)\s+(?:own\s+)?shares?\b")
        .expect("own share pattern")
});

static CUSTOM_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:owes?\s+(?:me\s+|you\s+|us\s+|them\s+)?(?:a\s+)?(?:half|quarter|third)|everyone\s+pays)\b",
    )
    .expect("custom split pattern")
});

static SPLIT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:split|splitting|shared?|sharing|divide[ds]?|between|among|each)\b")
        .expect("split keyword pattern")
});

/// Split style implied by the wording. Checks run in priority order and the
/// first hit wins; generic split words fall back to `Equal`.
pub fn detect_split_type(text: &str) -> DetectedSplit {
    if EQUAL_PHRASES.is_match(text) {
        DetectedSplit::Equal
    } else if PERCENT.is_match(text) {
        DetectedSplit::Percentage
    } else if OWN_SHARE.is_match(text) {
        DetectedSplit::Shares
    } else if CUSTOM_PHRASES.is_match(text) {
        DetectedSplit::Custom
    } else if SPLIT_KEYWORDS.is_match(text) {
        DetectedSplit::Equal
    } else {
        DetectedSplit::None
    }
}
