//! Trip lifecycle rules: creation, the forward-only status transitions, and
//! the derived-figure recomputation that accompanies every mutation.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::core::finance;
use crate::core::time::Clock;
use crate::ledger::{Expenses, Ledger, Trip, TripFields, TripStatus};

use super::{ServiceError, ServiceResult};

/// Validated operations on trips. Statuses only ever move forward:
/// draft → in_progress → returned → closed.
pub struct TripService;

impl TripService {
    /// Creates a trip in `draft`, registering its vehicle and driver in the
    /// masters when they have not been seen before.
    pub fn create(ledger: &mut Ledger, fields: TripFields) -> ServiceResult<Uuid> {
        validate_fields(&fields)?;

        let revenue = finance::revenue(fields.tonnage, fields.rate_per_ton);
        let now = Utc::now();
        let trip = Trip {
            id: Uuid::new_v4(),
            trip_start_date: fields.trip_start_date,
            estimated_end_date: fields.estimated_end_date,
            trip_end_date: None,
            vehicle_number: fields.vehicle_number.trim().to_string(),
            driver_name: fields.driver_name.trim().to_string(),
            partner: fields.partner,
            purchase_place: fields.purchase_place.trim().to_string(),
            item_name: fields.item_name.trim().to_string(),
            starting_km: fields.starting_km,
            closing_km: fields.closing_km,
            tonnage: fields.tonnage,
            rate_per_ton: fields.rate_per_ton,
            amount_given_to_driver: fields.amount_given_to_driver,
            notes: fields.notes,
            expenses: None,
            total_expenses: 0.0,
            revenue,
            profit: finance::profit(revenue, 0.0),
            status: TripStatus::Draft,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };

        ledger.ensure_vehicle(&trip.vehicle_number);
        ledger.ensure_driver(&trip.driver_name);
        Ok(ledger.upsert_trip(trip))
    }

    /// draft → in_progress. Fills in the start date from the clock when the
    /// record was saved without one.
    pub fn start(ledger: &mut Ledger, id: Uuid, clock: &dyn Clock) -> ServiceResult<()> {
        let trip = ledger
            .trip_mut(id)
            .ok_or(ServiceError::TripNotFound(id))?;
        if trip.status != TripStatus::Draft {
            return Err(ServiceError::state(format!(
                "only a draft trip can be started (currently {})",
                trip.status.as_str()
            )));
        }
        if trip.trip_start_date.is_none() {
            trip.trip_start_date = Some(clock.today());
        }
        trip.status = TripStatus::InProgress;
        trip.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// in_progress → returned. A status change only; expenses come later.
    pub fn mark_returned(ledger: &mut Ledger, id: Uuid) -> ServiceResult<()> {
        let trip = ledger
            .trip_mut(id)
            .ok_or(ServiceError::TripNotFound(id))?;
        if trip.status != TripStatus::InProgress {
            return Err(ServiceError::state(format!(
                "only a trip in progress can be marked returned (currently {})",
                trip.status.as_str()
            )));
        }
        trip.status = TripStatus::Returned;
        trip.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// Records (or replaces) the expense sheet together with the actual end
    /// date, recomputing every derived figure. A trip still in progress is
    /// advanced to `returned` in the same write.
    pub fn record_expenses(
        ledger: &mut Ledger,
        id: Uuid,
        expenses: Expenses,
        actual_end_date: NaiveDate,
    ) -> ServiceResult<()> {
        validate_expenses(&expenses)?;

        let trip = ledger
            .trip_mut(id)
            .ok_or(ServiceError::TripNotFound(id))?;
        if trip.status == TripStatus::Closed {
            return Err(ServiceError::state(
                "cannot record expenses on a closed trip",
            ));
        }
        if let Some(start) = trip.trip_start_date {
            if actual_end_date < start {
                return Err(ServiceError::validation(
                    "trip_end_date",
                    "end date must be on or after the trip start date",
                ));
            }
        }

        let total = finance::total_expenses(Some(&expenses));
        trip.revenue = finance::revenue(trip.tonnage, trip.rate_per_ton);
        trip.expenses = Some(expenses);
        trip.total_expenses = total;
        trip.profit = finance::profit(trip.revenue, total);
        trip.trip_end_date = Some(actual_end_date);
        if trip.status == TripStatus::InProgress {
            trip.status = TripStatus::Returned;
        }
        trip.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// returned → closed. Requires a recorded expense sheet and an end date
    /// that is not in the future; profit is recomputed once more before the
    /// record freezes.
    pub fn close(ledger: &mut Ledger, id: Uuid, clock: &dyn Clock) -> ServiceResult<()> {
        let today = clock.today();
        let trip = ledger
            .trip_mut(id)
            .ok_or(ServiceError::TripNotFound(id))?;
        if trip.status == TripStatus::Closed {
            return Err(ServiceError::state("trip is already closed"));
        }
        if trip.expenses.is_none() {
            return Err(ServiceError::state(
                "expenses must be recorded before closing a trip",
            ));
        }
        if trip.status != TripStatus::Returned {
            return Err(ServiceError::state(format!(
                "only a returned trip can be closed (currently {})",
                trip.status.as_str()
            )));
        }
        let end_date = trip.trip_end_date.ok_or_else(|| {
            ServiceError::state("trip end date is required to close a trip")
        })?;
        if end_date > today {
            return Err(ServiceError::state(
                "a trip can only be closed on or after its end date",
            ));
        }

        trip.status = TripStatus::Closed;
        trip.closed_at = Some(clock.now());
        trip.profit = finance::profit(trip.revenue, trip.total_expenses);
        trip.updated_at = Utc::now();
        tracing::info!(trip = %id, profit = trip.profit, "trip closed");
        ledger.touch();
        Ok(())
    }

    /// Replaces the editable fields of a trip that has not closed yet,
    /// re-running creation validation and recomputing revenue and profit.
    /// Status, expenses, and dates recorded by other transitions stay put.
    pub fn edit(ledger: &mut Ledger, id: Uuid, fields: TripFields) -> ServiceResult<()> {
        validate_fields(&fields)?;
        {
            let trip = ledger.trip(id).ok_or(ServiceError::TripNotFound(id))?;
            if trip.status == TripStatus::Closed {
                return Err(ServiceError::state("closed trips cannot be edited"));
            }
        }
        let vehicle_number = fields.vehicle_number.trim().to_string();
        let driver_name = fields.driver_name.trim().to_string();
        ledger.ensure_vehicle(&vehicle_number);
        ledger.ensure_driver(&driver_name);

        let trip = ledger
            .trip_mut(id)
            .ok_or(ServiceError::TripNotFound(id))?;
        trip.vehicle_number = vehicle_number;
        trip.driver_name = driver_name;
        trip.trip_start_date = fields.trip_start_date;
        trip.estimated_end_date = fields.estimated_end_date;
        trip.partner = fields.partner;
        trip.purchase_place = fields.purchase_place.trim().to_string();
        trip.item_name = fields.item_name.trim().to_string();
        trip.starting_km = fields.starting_km;
        trip.closing_km = fields.closing_km;
        trip.tonnage = fields.tonnage;
        trip.rate_per_ton = fields.rate_per_ton;
        trip.amount_given_to_driver = fields.amount_given_to_driver;
        trip.notes = fields.notes;
        trip.revenue = finance::revenue(trip.tonnage, trip.rate_per_ton);
        trip.profit = finance::profit(trip.revenue, trip.total_expenses);
        trip.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// Returns a snapshot of the ledger's trips. Callers sort as they need;
    /// insertion order carries no meaning.
    pub fn list(ledger: &Ledger) -> Vec<&Trip> {
        ledger.trips.iter().collect()
    }

    /// Removes a trip that has no recorded expenses and has not closed,
    /// returning the removed record.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Trip> {
        {
            let trip = ledger.trip(id).ok_or(ServiceError::TripNotFound(id))?;
            if trip.status == TripStatus::Closed {
                return Err(ServiceError::state("closed trips cannot be deleted"));
            }
            if trip.has_recorded_expenses() {
                return Err(ServiceError::state(
                    "trips with recorded expenses cannot be deleted",
                ));
            }
        }
        ledger
            .remove_trip(id)
            .ok_or(ServiceError::TripNotFound(id))
    }
}

fn validate_fields(fields: &TripFields) -> ServiceResult<()> {
    require_text("vehicle_number", &fields.vehicle_number)?;
    require_text("driver_name", &fields.driver_name)?;
    require_text("purchase_place", &fields.purchase_place)?;
    require_text("item_name", &fields.item_name)?;

    let start = fields
        .trip_start_date
        .ok_or_else(|| ServiceError::validation("trip_start_date", "this field is required"))?;
    if let Some(estimated) = fields.estimated_end_date {
        if estimated < start {
            return Err(ServiceError::validation(
                "estimated_end_date",
                "end date must be on or after the trip start date",
            ));
        }
    }

    require_non_negative("starting_km", fields.starting_km)?;
    require_non_negative("closing_km", fields.closing_km)?;
    require_non_negative("tonnage", fields.tonnage)?;
    require_non_negative("rate_per_ton", fields.rate_per_ton)?;
    require_non_negative("amount_given_to_driver", fields.amount_given_to_driver)?;
    if let (Some(starting), Some(closing)) = (fields.starting_km, fields.closing_km) {
        if closing < starting {
            return Err(ServiceError::validation(
                "closing_km",
                "closing kilometers must not be below starting kilometers",
            ));
        }
    }
    Ok(())
}

fn validate_expenses(expenses: &Expenses) -> ServiceResult<()> {
    for (name, amount) in expenses.entries() {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ServiceError::validation(
                name,
                "expense amounts must be non-negative numbers",
            ));
        }
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::validation(field, "this field is required"))
    } else {
        Ok(())
    }
}

fn require_non_negative(field: &str, value: Option<f64>) -> ServiceResult<()> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(ServiceError::validation(
            field,
            "must be a non-negative number",
        )),
        _ => Ok(()),
    }
}
