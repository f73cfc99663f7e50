use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a trip participant (the user id of the account).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Parses a UUID-shaped string. Anything else is not an id.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ParticipantId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Amount in integer minor units of some currency (cents for USD, yen for JPY).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Amount in major units of `currency` (`1234` cents is `12.34`).
    pub fn to_major(self, currency: CurrencyCode) -> Decimal {
        Decimal::new(self.0, currency.minor_unit_exponent())
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    /// Sum that reports overflow instead of wrapping. Amounts coming from
    /// user input go through this rather than [`Sum`].
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |total, amount| total.checked_add(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// ISO 4217 currency code, stored upper-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode([u8; 3]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a three-letter currency code")]
pub struct InvalidCurrencyCode(pub String);

impl CurrencyCode {
    pub const USD: Self = Self(*b"USD");
    pub const EUR: Self = Self(*b"EUR");
    pub const GBP: Self = Self(*b"GBP");
    pub const JPY: Self = Self(*b"JPY");
    pub const INR: Self = Self(*b"INR");
    pub const CHF: Self = Self(*b"CHF");

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Number of decimal places of the currency's minor unit.
    pub fn minor_unit_exponent(self) -> u32 {
        match &self.0 {
            b"JPY" | b"KRW" | b"VND" | b"CLP" | b"ISK" | b"PYG" | b"UGX" | b"XAF" | b"XOF" => 0,
            b"BHD" | b"KWD" | b"OMR" | b"JOD" | b"TND" | b"LYD" | b"IQD" => 3,
            _ => 2,
        }
    }

    /// Minor units per major unit: 100 for USD, 1 for JPY, 1000 for KWD.
    pub fn minor_unit_scale(self) -> Decimal {
        Decimal::from(10_i64.pow(self.minor_unit_exponent()))
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.trim().as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(InvalidCurrencyCode(value.to_string())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Owner,
    #[default]
    Participant,
    Viewer,
}

impl ParticipantRole {
    /// Viewers can see a trip but never owe or are owed money on it.
    pub fn can_hold_shares(self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripParticipant {
    pub user_id: ParticipantId,
    pub full_name: String,
    #[serde(default)]
    pub role: ParticipantRole,
    #[serde(default)]
    pub join_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub join_end_date: Option<NaiveDate>,
}

impl TripParticipant {
    pub fn new(user_id: ParticipantId, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
            role: ParticipantRole::Participant,
            join_start_date: None,
            join_end_date: None,
        }
    }

    pub fn with_role(mut self, role: ParticipantRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.join_start_date = start;
        self.join_end_date = end;
        self
    }

    /// Inclusive membership window check; a missing bound is open-ended.
    pub fn is_member_on(&self, date: NaiveDate) -> bool {
        self.join_start_date.is_none_or(|start| start <= date)
            && self.join_end_date.is_none_or(|end| date <= end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Percentage,
    Custom,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    Equal,
    Percentage,
    Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub participant_id: ParticipantId,
    pub share_amount: Money,
    pub share_type: ShareType,
    /// The percentage or literal amount that produced `share_amount`.
    pub share_value: Option<Decimal>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Activities,
    Shopping,
    #[default]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub payer_id: ParticipantId,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub split_type: SplitType,
    pub shares: Vec<ExpenseShare>,
}

impl Expense {
    /// Sum of the share amounts; `None` when it does not fit in `i64`.
    pub fn shares_total(&self) -> Option<Money> {
        Money::checked_sum(self.shares.iter().map(|share| share.share_amount))
    }

    /// True when the shares reconstruct the total exactly.
    pub fn is_balanced(&self) -> bool {
        self.shares_total() == Some(self.amount)
    }
}

/// Signed net position. Positive: the group owes this participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// Balances keyed by participant, iterated in the caller's participant order.
pub type MemberBalances = IndexMap<ParticipantId, Money>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Suggested payment: `from` pays `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
    pub currency: CurrencyCode,
}

impl Transfer {
    pub fn in_currency(self, currency: CurrencyCode) -> Settlement {
        Settlement {
            from: self.from,
            to: self.to,
            amount: self.amount,
            currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::upper("USD", Some(CurrencyCode::USD))]
    #[case::lower("eur", Some(CurrencyCode::EUR))]
    #[case::padded(" jpy ", Some(CurrencyCode::JPY))]
    #[case::too_long("EURO", None)]
    #[case::digits("U5D", None)]
    #[case::symbol("$", None)]
    fn parses_currency_codes(#[case] input: &str, #[case] expected: Option<CurrencyCode>) {
        assert_eq!(input.parse::<CurrencyCode>().ok(), expected);
    }

    #[rstest]
    #[case::dollar(CurrencyCode::USD, 1234, "12.34")]
    #[case::yen(CurrencyCode::JPY, 1500, "1500")]
    #[case::dinar("KWD".parse().unwrap(), -12_345, "-12.345")]
    fn converts_to_major_units(
        #[case] currency: CurrencyCode,
        #[case] minor: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(Money::from_i64(minor).to_major(currency).to_string(), expected);
        assert_eq!(
            Decimal::from(minor) / currency.minor_unit_scale(),
            expected.parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let max = Money::from_i64(i64::MAX);
        assert_eq!(max.checked_add(Money::from_i64(1)), None);
        assert_eq!(Money::from_i64(i64::MIN).checked_sub(Money::from_i64(1)), None);
        assert_eq!(Money::from_i64(i64::MIN).checked_neg(), None);
        assert_eq!(Money::checked_sum([max, max, Money::from_i64(2)]), None);
        assert_eq!(
            Money::checked_sum([max, Money::from_i64(-5)]),
            Some(Money::from_i64(i64::MAX - 5))
        );
    }

    #[rstest]
    #[case::dollar(CurrencyCode::USD, 2)]
    #[case::yen(CurrencyCode::JPY, 0)]
    #[case::dinar("KWD".parse().unwrap(), 3)]
    fn reports_minor_unit_exponent(#[case] currency: CurrencyCode, #[case] expected: u32) {
        assert_eq!(currency.minor_unit_exponent(), expected);
    }

    #[rstest]
    #[case::open_window(None, None, "2024-06-01", true)]
    #[case::inside(Some("2024-06-01"), Some("2024-06-10"), "2024-06-05", true)]
    #[case::first_day(Some("2024-06-01"), Some("2024-06-10"), "2024-06-01", true)]
    #[case::last_day(Some("2024-06-01"), Some("2024-06-10"), "2024-06-10", true)]
    #[case::before(Some("2024-06-01"), Some("2024-06-10"), "2024-05-31", false)]
    #[case::after(Some("2024-06-01"), Some("2024-06-10"), "2024-06-11", false)]
    #[case::open_end(Some("2024-06-01"), None, "2030-01-01", true)]
    fn membership_window_is_inclusive(
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
        #[case] date: &str,
        #[case] expected: bool,
    ) {
        let parse = |value: &str| value.parse::<NaiveDate>().unwrap();
        let participant = TripParticipant::new(ParticipantId(Uuid::from_u128(1)), "Alice")
            .with_window(start.map(parse), end.map(parse));

        assert_eq!(participant.is_member_on(parse(date)), expected);
    }

    #[test]
    fn participant_id_only_accepts_uuid_shapes() {
        assert!(ParticipantId::parse("6f1c2a34-8d2e-4c1b-9a77-0e5b3f3c9d10").is_some());
        assert!(ParticipantId::parse("alice").is_none());
        assert!(ParticipantId::parse("").is_none());
    }

    #[test]
    fn currency_code_round_trips_through_json() {
        let json = serde_json::to_string(&CurrencyCode::GBP).unwrap();
        assert_eq!(json, "\"GBP\"");
        let parsed: CurrencyCode = serde_json::from_str("\"chf\"").unwrap();
        assert_eq!(parsed, CurrencyCode::CHF);
    }
}
