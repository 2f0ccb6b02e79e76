use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fleet_core::{core::time::Clock, ledger::TripFields, storage::JsonStorage};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated storage backend rooted in a unique directory.
pub fn setup_storage() -> JsonStorage {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStorage::new(Some(base), Some(3)).expect("create json storage backend")
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn clock_at(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap())
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The worked example used across the lifecycle suites: ten tons of cement
/// out of Nagpur at ₹650 a ton.
pub fn cement_run() -> TripFields {
    TripFields {
        vehicle_number: "MH12AB1234".into(),
        driver_name: "Ravi".into(),
        trip_start_date: Some(date(2024, 1, 1)),
        purchase_place: "Nagpur".into(),
        item_name: "Cement".into(),
        tonnage: Some(10.0),
        rate_per_ton: Some(650.0),
        ..TripFields::default()
    }
}
