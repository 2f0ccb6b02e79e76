use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single haulage trip, from draft through closing.
///
/// `revenue`, `total_expenses`, and `profit` are cached derivations; the
/// lifecycle services recompute them on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub trip_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub trip_end_date: Option<NaiveDate>,
    pub vehicle_number: String,
    pub driver_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    pub purchase_place: String,
    pub item_name: String,
    #[serde(default)]
    pub starting_km: Option<f64>,
    #[serde(default)]
    pub closing_km: Option<f64>,
    #[serde(default)]
    pub tonnage: Option<f64>,
    #[serde(default)]
    pub rate_per_ton: Option<f64>,
    #[serde(default)]
    pub amount_given_to_driver: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub expenses: Option<Expenses>,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub profit: f64,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Kilometers covered, when both odometer readings were captured.
    pub fn distance(&self) -> Option<f64> {
        match (self.starting_km, self.closing_km) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// True once an expense sheet with a non-zero total has been recorded.
    pub fn has_recorded_expenses(&self) -> bool {
        self.expenses.is_some() && self.total_expenses > 0.0
    }

    /// The date a closed trip is accounted under: `closed_at`, falling back
    /// to the last modification for records closed before `closed_at` existed.
    pub fn accounting_date(&self) -> NaiveDate {
        self.closed_at.unwrap_or(self.updated_at).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    InProgress,
    Returned,
    Closed,
}

impl TripStatus {
    /// Every status except `Closed` counts as an active trip.
    pub fn is_active(&self) -> bool {
        !matches!(self, TripStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::InProgress => "in_progress",
            TripStatus::Returned => "returned",
            TripStatus::Closed => "closed",
        }
    }
}

/// Per-trip expense sheet. Missing entries load as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Expenses {
    #[serde(default)]
    pub food: f64,
    #[serde(default)]
    pub diesel: f64,
    #[serde(default)]
    pub toll: f64,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub gst: f64,
    #[serde(default)]
    pub other: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_description: Option<String>,
}

impl Expenses {
    /// Named amounts, in the order they appear on the sheet.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("food", self.food),
            ("diesel", self.diesel),
            ("toll", self.toll),
            ("salary", self.salary),
            ("gst", self.gst),
            ("other", self.other),
        ]
    }
}

/// Field set accepted by trip creation and editing.
#[derive(Debug, Clone, Default)]
pub struct TripFields {
    pub vehicle_number: String,
    pub driver_name: String,
    pub trip_start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub partner: Option<String>,
    pub purchase_place: String,
    pub item_name: String,
    pub starting_km: Option<f64>,
    pub closing_km: Option<f64>,
    pub tonnage: Option<f64>,
    pub rate_per_ton: Option<f64>,
    pub amount_given_to_driver: Option<f64>,
    pub notes: Option<String>,
}
