#![warn(clippy::uninlined_format_args)]

pub mod metadata;
pub mod model;
pub mod services;

pub use metadata::ItineraryMetadata;
pub use model::{
    Balance, CurrencyCode, Expense, ExpenseCategory, ExpenseShare, InvalidCurrencyCode,
    MemberBalances, Money, ParticipantId, ParticipantRole, Settlement, ShareType, SplitType,
    Transfer, TripParticipant,
};
pub use services::{
    BalanceCalculator, FuzzyNameMatcher, FxSnapshot, NameMatcher, ParticipantResolver,
    SettlementCalculator, ShareBuilder, SplitSpec,
};
