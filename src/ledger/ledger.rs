use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{driver::Driver, trip::Trip, vehicle::Vehicle};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Owns every record collection: trips plus the vehicle/driver masters.
///
/// Callers never hold references into the collections across mutations;
/// services look records up again by id on each call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            trips: Vec::new(),
            vehicles: Vec::new(),
            drivers: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Inserts or replaces a trip by id, stamping its `updated_at`.
    pub fn upsert_trip(&mut self, mut trip: Trip) -> Uuid {
        trip.updated_at = Utc::now();
        let id = trip.id;
        match self.trips.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = trip,
            None => self.trips.push(trip),
        }
        self.touch();
        id
    }

    pub fn trip(&self, id: Uuid) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id == id)
    }

    pub fn trip_mut(&mut self, id: Uuid) -> Option<&mut Trip> {
        self.trips.iter_mut().find(|trip| trip.id == id)
    }

    /// Removes a trip, returning it. Absent ids are a no-op.
    pub fn remove_trip(&mut self, id: Uuid) -> Option<Trip> {
        let index = self.trips.iter().position(|trip| trip.id == id)?;
        let removed = self.trips.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn vehicle(&self, id: Uuid) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn vehicle_by_number(&self, vehicle_number: &str) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.vehicle_number == vehicle_number)
    }

    pub fn driver(&self, id: Uuid) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.id == id)
    }

    pub fn driver_by_name(&self, name: &str) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.name == name)
    }

    /// Registers the vehicle number if it has not been seen before.
    pub fn ensure_vehicle(&mut self, vehicle_number: &str) -> Uuid {
        if let Some(existing) = self.vehicle_by_number(vehicle_number) {
            return existing.id;
        }
        let vehicle = Vehicle::new(vehicle_number);
        let id = vehicle.id;
        self.vehicles.push(vehicle);
        self.touch();
        id
    }

    /// Registers the driver name if it has not been seen before.
    pub fn ensure_driver(&mut self, name: &str) -> Uuid {
        if let Some(existing) = self.driver_by_name(name) {
            return existing.id;
        }
        let driver = Driver::new(name);
        let id = driver.id;
        self.drivers.push(driver);
        self.touch();
        id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TripStatus;

    #[test]
    fn upsert_replaces_by_id_and_bumps_updated_at() {
        let mut ledger = Ledger::new("Fleet");
        let trip = sample_trip();
        let id = ledger.upsert_trip(trip.clone());
        let first_stamp = ledger.trip(id).unwrap().updated_at;

        let mut changed = trip;
        changed.driver_name = "Suresh".into();
        ledger.upsert_trip(changed);

        assert_eq!(ledger.trip_count(), 1);
        let stored = ledger.trip(id).unwrap();
        assert_eq!(stored.driver_name, "Suresh");
        assert!(stored.updated_at >= first_stamp);
    }

    #[test]
    fn remove_is_a_no_op_for_unknown_ids() {
        let mut ledger = Ledger::new("Fleet");
        assert!(ledger.remove_trip(Uuid::new_v4()).is_none());
        assert_eq!(ledger.trip_count(), 0);
    }

    #[test]
    fn ensure_vehicle_does_not_duplicate() {
        let mut ledger = Ledger::new("Fleet");
        let first = ledger.ensure_vehicle("MH12AB1234");
        let second = ledger.ensure_vehicle("MH12AB1234");
        assert_eq!(first, second);
        assert_eq!(ledger.vehicles.len(), 1);
    }

    fn sample_trip() -> Trip {
        let now = Utc::now();
        Trip {
            id: Uuid::new_v4(),
            trip_start_date: None,
            estimated_end_date: None,
            trip_end_date: None,
            vehicle_number: "MH12AB1234".into(),
            driver_name: "Ravi".into(),
            partner: None,
            purchase_place: "Nagpur".into(),
            item_name: "Cement".into(),
            starting_km: None,
            closing_km: None,
            tonnage: None,
            rate_per_ton: None,
            amount_given_to_driver: None,
            notes: None,
            expenses: None,
            total_expenses: 0.0,
            revenue: 0.0,
            profit: 0.0,
            status: TripStatus::Draft,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }
}
