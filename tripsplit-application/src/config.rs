use tripsplit_domain::{
    CurrencyCode,
    services::{DEFAULT_MATCH_THRESHOLD, PercentagePolicy},
};
use tripsplit_tokenizer::DecimalFormat;

/// Tunables shared by the ledger and the draft builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerConfig {
    /// Minimum fuzzy-match confidence for a typed name to resolve.
    pub match_threshold: f64,
    pub percentage_policy: PercentagePolicy,
    pub decimal_format: DecimalFormat,
    /// Currency assumed for drafts whose text names none.
    pub default_currency: CurrencyCode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            percentage_policy: PercentagePolicy::Lenient,
            decimal_format: DecimalFormat::Us,
            default_currency: CurrencyCode::USD,
        }
    }
}
