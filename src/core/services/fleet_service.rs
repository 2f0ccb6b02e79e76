use uuid::Uuid;

use crate::ledger::{Driver, Ledger, Vehicle};

use super::{ServiceError, ServiceResult};

/// Maintains the vehicle and driver masters. Trips reference both by their
/// natural keys, so removal is refused while any trip still points at one.
pub struct FleetService;

impl FleetService {
    pub fn add_vehicle(ledger: &mut Ledger, vehicle_number: &str) -> ServiceResult<Uuid> {
        let vehicle_number = vehicle_number.trim();
        if vehicle_number.is_empty() {
            return Err(ServiceError::validation(
                "vehicle_number",
                "this field is required",
            ));
        }
        if Self::vehicle_number_taken(ledger, vehicle_number) {
            return Err(ServiceError::validation(
                "vehicle_number",
                format!("vehicle `{vehicle_number}` already exists"),
            ));
        }
        Ok(ledger.ensure_vehicle(vehicle_number))
    }

    pub fn add_driver(ledger: &mut Ledger, name: &str) -> ServiceResult<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name", "this field is required"));
        }
        if Self::driver_name_taken(ledger, name) {
            return Err(ServiceError::validation(
                "name",
                format!("driver `{name}` already exists"),
            ));
        }
        Ok(ledger.ensure_driver(name))
    }

    /// Records which driver currently operates the vehicle.
    pub fn assign_driver(
        ledger: &mut Ledger,
        vehicle_id: Uuid,
        driver_name: Option<&str>,
    ) -> ServiceResult<()> {
        let assignment = driver_name.map(|name| name.trim().to_string());
        let vehicle = ledger
            .vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == vehicle_id)
            .ok_or_else(|| ServiceError::VehicleNotFound(vehicle_id.to_string()))?;
        vehicle.current_driver_name = assignment.filter(|name| !name.is_empty());
        ledger.touch();
        Ok(())
    }

    pub fn remove_vehicle(ledger: &mut Ledger, id: Uuid) -> ServiceResult<()> {
        let number = ledger
            .vehicle(id)
            .map(|vehicle| vehicle.vehicle_number.clone())
            .ok_or_else(|| ServiceError::VehicleNotFound(id.to_string()))?;
        if ledger
            .trips
            .iter()
            .any(|trip| trip.vehicle_number == number)
        {
            return Err(ServiceError::state(format!(
                "vehicle `{number}` has linked trips"
            )));
        }
        ledger.vehicles.retain(|vehicle| vehicle.id != id);
        ledger.touch();
        Ok(())
    }

    pub fn remove_driver(ledger: &mut Ledger, id: Uuid) -> ServiceResult<()> {
        let name = ledger
            .driver(id)
            .map(|driver| driver.name.clone())
            .ok_or_else(|| ServiceError::DriverNotFound(id.to_string()))?;
        if ledger.trips.iter().any(|trip| trip.driver_name == name) {
            return Err(ServiceError::state(format!(
                "driver `{name}` has linked trips"
            )));
        }
        ledger.drivers.retain(|driver| driver.id != id);
        ledger.touch();
        Ok(())
    }

    pub fn vehicles(ledger: &Ledger) -> Vec<&Vehicle> {
        ledger.vehicles.iter().collect()
    }

    pub fn drivers(ledger: &Ledger) -> Vec<&Driver> {
        ledger.drivers.iter().collect()
    }

    fn vehicle_number_taken(ledger: &Ledger, candidate: &str) -> bool {
        let normalized = candidate.to_ascii_lowercase();
        ledger
            .vehicles
            .iter()
            .any(|vehicle| vehicle.vehicle_number.trim().to_ascii_lowercase() == normalized)
    }

    fn driver_name_taken(ledger: &Ledger, candidate: &str) -> bool {
        let normalized = candidate.to_ascii_lowercase();
        ledger
            .drivers
            .iter()
            .any(|driver| driver.name.trim().to_ascii_lowercase() == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::core::services::TripService;
    use crate::ledger::TripFields;

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut ledger = Ledger::new("Fleet");
        FleetService::add_driver(&mut ledger, "Ravi").unwrap();
        let err = FleetService::add_driver(&mut ledger, " ravi ").unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn removal_is_refused_while_trips_reference_the_entry() {
        let mut ledger = Ledger::new("Fleet");
        TripService::create(
            &mut ledger,
            TripFields {
                vehicle_number: "MH12AB1234".into(),
                driver_name: "Ravi".into(),
                trip_start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                purchase_place: "Nagpur".into(),
                item_name: "Cement".into(),
                ..TripFields::default()
            },
        )
        .unwrap();

        let vehicle_id = ledger.vehicle_by_number("MH12AB1234").unwrap().id;
        let driver_id = ledger.driver_by_name("Ravi").unwrap().id;
        assert!(matches!(
            FleetService::remove_vehicle(&mut ledger, vehicle_id),
            Err(ServiceError::State(_))
        ));
        assert!(matches!(
            FleetService::remove_driver(&mut ledger, driver_id),
            Err(ServiceError::State(_))
        ));
    }

    #[test]
    fn unreferenced_entries_can_be_removed() {
        let mut ledger = Ledger::new("Fleet");
        let id = FleetService::add_vehicle(&mut ledger, "MH12AB1234").unwrap();
        FleetService::remove_vehicle(&mut ledger, id).unwrap();
        assert!(ledger.vehicle_by_number("MH12AB1234").is_none());
    }

    #[test]
    fn assign_driver_clears_blank_names() {
        let mut ledger = Ledger::new("Fleet");
        let id = FleetService::add_vehicle(&mut ledger, "MH12AB1234").unwrap();
        FleetService::assign_driver(&mut ledger, id, Some("Ravi")).unwrap();
        assert_eq!(
            ledger.vehicle(id).unwrap().current_driver_name.as_deref(),
            Some("Ravi")
        );
        FleetService::assign_driver(&mut ledger, id, Some("  ")).unwrap();
        assert!(ledger.vehicle(id).unwrap().current_driver_name.is_none());
    }
}
