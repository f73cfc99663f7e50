use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::text::capitalize;

// Words that show up in "with ..." lists but never name a person.
const NOISE_WORDS: &[&str] = &[
    "me", "us", "you", "him", "her", "them", "myself", "everyone", "everybody", "all", "the",
    "a", "an", "my", "our", "their", "friends", "friend", "family", "others", "other", "guys",
    "team", "group", "people", "and", "or", "of", "for", "each", "both", "some",
];

// Capitalised words that are not names: pronouns, calendar words and the
// nouns people start expense notes with.
const NON_NAMES: &[&str] = &[
    "i", "we", "you", "he", "she", "they", "it", "me", "us", "my", "our", "the", "a", "an",
    "this", "that", "these", "those", "and", "or", "but", "with", "for", "at", "in", "on", "to",
    "from", "between", "among", "split", "paid", "pay", "each", "everyone", "total", "plus",
    "tip", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "today", "yesterday", "tonight", "dinner", "lunch",
    "breakfast", "brunch", "coffee", "drinks", "food", "groceries", "snacks", "restaurant",
    "cafe", "bar", "taxi", "uber", "lyft", "train", "flight", "flights", "bus", "metro",
    "ferry", "gas", "fuel", "parking", "car", "rental", "hotel", "hostel", "airbnb", "room",
    "museum", "tour", "tickets", "ticket", "concert", "show", "park", "entrance", "shopping",
    "souvenirs", "gift", "market", "expense", "bill",
];

static WITH_LIST: LazyLock<Regex> = LazyLock::new(|| list_pattern("with"));
static BETWEEN_LIST: LazyLock<Regex> = LazyLock::new(|| list_pattern("between"));
static CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+\b").expect("capitalized word pattern"));
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*,\s*(?:and\s+)?|\s+and\s+").expect("list separator"));

fn list_pattern(lead: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\b{lead}\s+(\p{{L}}+(?:(?:\s*,\s*(?:and\s+)?|\s+and\s+)\p{{L}}+)*)"
    ))
    .expect("name list pattern")
}

fn is_name_like(word: &str) -> bool {
    let len = word.chars().count();
    (2..=20).contains(&len) && word.chars().all(char::is_alphabetic)
}

fn is_excluded(word: &str) -> bool {
    let lower = word.to_lowercase();
    NOISE_WORDS.contains(&lower.as_str()) || NON_NAMES.contains(&lower.as_str())
}

fn list_names(pattern: &Regex, text: &str) -> Vec<String> {
    let Some(list) = pattern.captures(text).and_then(|captures| captures.get(1)) else {
        return Vec::new();
    };
    LIST_SEPARATOR
        .split(list.as_str())
        .map(str::trim)
        .filter(|entry| is_name_like(entry))
        .filter(|entry| !is_excluded(entry))
        .map(capitalize)
        .collect()
}

fn capitalized_names(text: &str) -> Vec<String> {
    CAPITALIZED
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| is_name_like(word))
        .filter(|word| !is_excluded(word))
        .map(capitalize)
        .collect()
}

/// Likely participant names, deduplicated in first-seen order.
///
/// Combines the "with A, B and C" list, the "between A, B, and C" list and
/// any remaining capitalised words that are not known non-names.
pub fn extract_names(text: &str) -> Vec<String> {
    let names: IndexSet<String> = list_names(&WITH_LIST, text)
        .into_iter()
        .chain(list_names(&BETWEEN_LIST, text))
        .chain(capitalized_names(text))
        .collect();
    names.into_iter().collect()
}

static SELF_PAID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:i|me)\s+paid\b").expect("self payer pattern"));
static NAMED_PAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\p{L}+)\s+paid(?:\s+for)?\b").expect("named payer pattern")
});

// Words that can sit in front of "paid" without being the payer.
const NOT_PAYERS: &[&str] = &[
    "already", "just", "was", "were", "is", "are", "be", "been", "has", "have", "had", "who",
    "fully", "not", "never", "also",
];

/// Who paid, per the text. "I paid" and "me paid" yield the literal `"I"`.
pub fn extract_payer(text: &str) -> Option<String> {
    if SELF_PAID.is_match(text) {
        return Some("I".to_string());
    }

    NAMED_PAYER
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|word| word.as_str().to_lowercase())
        .find(|word| !NOT_PAYERS.contains(&word.as_str()))
        .map(|word| capitalize(&word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::with_list("dinner with alice, bob and carol.", vec!["Alice", "Bob", "Carol"])]
    #[case::oxford_comma("Taxi between Dan, Eve, and Frank", vec!["Dan", "Eve", "Frank"])]
    #[case::noise_filtered("lunch with me and sam", vec!["Sam"])]
    #[case::capitalized_fallback("Museum tickets for Priya and Tom", vec!["Priya", "Tom"])]
    #[case::union_dedup(
        "Dinner with alice and Bob, Alice paid",
        vec!["Alice", "Bob"]
    )]
    #[case::too_short("with a and bo", vec!["Bo"])]
    #[case::no_names("paid 40 for groceries", vec![])]
    #[case::empty("", vec![])]
    fn extracts_names(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(extract_names(text), expected);
    }

    #[rstest]
    #[case::self_payer("I paid $40 for dinner", Some("I"))]
    #[case::me_payer("me paid", Some("I"))]
    #[case::named("Dinner, alice paid 60", Some("Alice"))]
    #[case::paid_for("Bob paid for the tickets", Some("Bob"))]
    #[case::skips_auxiliary("already paid, Carol paid the rest", Some("Carol"))]
    #[case::no_payer("Taxi 30 split 3 ways", None)]
    #[case::empty("", None)]
    fn extracts_payer(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_payer(text).as_deref(), expected);
    }
}
