pub mod balance_calculator;
pub mod fx_conversion;
pub mod name_matcher;
pub mod participant_resolver;
pub mod settlement_calculator;
pub mod share_builder;

pub use balance_calculator::{BalanceCalculator, BalanceError, to_balance_list};
pub use fx_conversion::{FxError, FxSnapshot, convert_amount, convert_expense, convert_shares};
pub use name_matcher::{
    DEFAULT_MATCH_THRESHOLD, FuzzyNameMatcher, NameMatch, NameMatchError, NameMatcher,
};
pub use participant_resolver::{ParticipantResolver, PayerResolution, ResolveError};
pub use settlement_calculator::{SettlementCalculator, SettlementError};
pub use share_builder::{
    CustomSplit, PercentagePolicy, PercentageSplit, ShareBuildError, ShareBuilder, SplitSpec,
    split_equally,
};
