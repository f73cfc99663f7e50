//! Typed extension data attached to itinerary items and expenses.
//!
//! Each category carries its own optional-field struct, so display code
//! matches exhaustively on [`ItineraryMetadata`] instead of probing a map.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::ExpenseCategory;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ItineraryMetadata {
    Transport(TransportDetails),
    Accommodation(AccommodationDetails),
    Dining(DiningDetails),
    Activity(ActivityDetails),
    Sightseeing(SightseeingDetails),
    General(GeneralDetails),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Car,
    Ferry,
    Taxi,
    Walk,
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportDetails {
    pub mode: Option<TransportMode>,
    pub carrier: Option<String>,
    pub reference: Option<String>,
    pub departure_location: Option<String>,
    pub arrival_location: Option<String>,
    pub departure_time: Option<NaiveTime>,
    pub arrival_time: Option<NaiveTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccommodationDetails {
    pub property_name: Option<String>,
    pub address: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub confirmation_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiningDetails {
    pub restaurant: Option<String>,
    pub cuisine: Option<String>,
    pub reservation_time: Option<NaiveTime>,
    pub party_size: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDetails {
    pub provider: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub booking_reference: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightseeingDetails {
    pub landmark: Option<String>,
    pub location: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub ticket_required: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralDetails {
    pub notes: Option<String>,
    pub url: Option<String>,
}

impl ItineraryMetadata {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Accommodation(_) => "accommodation",
            Self::Dining(_) => "dining",
            Self::Activity(_) => "activity",
            Self::Sightseeing(_) => "sightseeing",
            Self::General(_) => "general",
        }
    }

    /// Expense category used when an expense is created from this item.
    pub fn expense_category(&self) -> ExpenseCategory {
        match self {
            Self::Transport(_) => ExpenseCategory::Transport,
            Self::Accommodation(_) => ExpenseCategory::Accommodation,
            Self::Dining(_) => ExpenseCategory::Food,
            Self::Activity(_) | Self::Sightseeing(_) => ExpenseCategory::Activities,
            Self::General(_) => ExpenseCategory::Other,
        }
    }
}
