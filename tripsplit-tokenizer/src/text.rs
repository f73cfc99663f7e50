use std::sync::LazyLock;

use regex::Regex;

pub(crate) static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+").expect("word pattern"));

/// Character offset of a byte index into `text`.
pub(crate) fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// "aLiCe" -> "Alice".
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lower-cased words of `text` with their byte ranges.
pub(crate) fn words(text: &str) -> impl Iterator<Item = (String, std::ops::Range<usize>)> + '_ {
    WORD.find_iter(text)
        .map(|m| (m.as_str().to_lowercase(), m.range()))
}
