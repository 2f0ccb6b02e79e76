//! Read-only aggregation over the trip collection. Nothing here mutates the
//! ledger; every function recomputes from scratch on each call.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::time::month_name;
use crate::ledger::{Ledger, Trip, TripStatus};

pub struct ReportService;

/// One month of closed-trip profit, labelled for charting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyProfitPoint {
    pub month0: u32,
    pub year: i32,
    pub month_name: String,
    pub profit: f64,
    pub label: String,
}

/// Per-category expense totals across a set of trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpenseBreakdown {
    pub food: f64,
    pub diesel: f64,
    pub toll: f64,
    pub salary: f64,
    pub gst: f64,
    pub other: f64,
}

impl ExpenseBreakdown {
    pub fn total(&self) -> f64 {
        self.food + self.diesel + self.toll + self.salary + self.gst + self.other
    }
}

/// Trip counts per lifecycle status; every status is always present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusDistribution {
    pub draft: usize,
    pub in_progress: usize,
    pub returned: usize,
    pub closed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverPerformance {
    pub driver_name: String,
    pub total_trips: usize,
    pub total_profit: f64,
    pub avg_profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehiclePerformance {
    pub vehicle_number: String,
    pub total_trips: usize,
    pub total_profit: f64,
    pub avg_profit: f64,
}

/// Closed-trip totals for a reporting window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripReport {
    pub total_trips: usize,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
}

/// The headline figures shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub monthly_profit: f64,
    pub yearly_profit: f64,
    pub monthly_expenses: f64,
    pub active_trips: usize,
}

/// Month-over-month profit movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfitChange {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl ReportService {
    /// Profit of trips closed in the given month (`month0` is zero-based).
    pub fn monthly_profit(ledger: &Ledger, month0: u32, year: i32) -> f64 {
        closed_in_month(ledger, month0, year)
            .map(|trip| trip.profit)
            .sum()
    }

    /// Profit of trips closed in the given calendar year.
    pub fn yearly_profit(ledger: &Ledger, year: i32) -> f64 {
        closed_trips(ledger)
            .filter(|trip| trip.accounting_date().year() == year)
            .map(|trip| trip.profit)
            .sum()
    }

    /// Expense total of trips closed in the given month.
    pub fn monthly_expenses(ledger: &Ledger, month0: u32, year: i32) -> f64 {
        closed_in_month(ledger, month0, year)
            .map(|trip| trip.total_expenses)
            .sum()
    }

    /// Profit per month for the `months` months ending at `reference`,
    /// oldest first. Recomputed fresh on every call.
    pub fn last_months_profit(
        ledger: &Ledger,
        months: usize,
        reference: NaiveDate,
    ) -> Vec<MonthlyProfitPoint> {
        let anchor = reference.year() as i64 * 12 + reference.month0() as i64;
        (0..months as i64)
            .rev()
            .map(|back| {
                let index = anchor - back;
                let year = index.div_euclid(12) as i32;
                let month0 = index.rem_euclid(12) as u32;
                let name = month_name(month0);
                MonthlyProfitPoint {
                    month0,
                    year,
                    month_name: name.to_string(),
                    profit: Self::monthly_profit(ledger, month0, year),
                    label: format!("{name} {year}"),
                }
            })
            .collect()
    }

    /// Sums each expense category across the given trips; trips without a
    /// recorded sheet contribute nothing.
    pub fn expense_breakdown<'a, I>(trips: I) -> ExpenseBreakdown
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut breakdown = ExpenseBreakdown::default();
        for trip in trips {
            if let Some(expenses) = &trip.expenses {
                breakdown.food += sane(expenses.food);
                breakdown.diesel += sane(expenses.diesel);
                breakdown.toll += sane(expenses.toll);
                breakdown.salary += sane(expenses.salary);
                breakdown.gst += sane(expenses.gst);
                breakdown.other += sane(expenses.other);
            }
        }
        breakdown
    }

    /// Number of trips not yet closed.
    pub fn active_trips_count(ledger: &Ledger) -> usize {
        ledger
            .trips
            .iter()
            .filter(|trip| trip.status.is_active())
            .count()
    }

    pub fn status_distribution(ledger: &Ledger) -> StatusDistribution {
        let mut distribution = StatusDistribution::default();
        for trip in &ledger.trips {
            match trip.status {
                TripStatus::Draft => distribution.draft += 1,
                TripStatus::InProgress => distribution.in_progress += 1,
                TripStatus::Returned => distribution.returned += 1,
                TripStatus::Closed => distribution.closed += 1,
            }
        }
        distribution
    }

    /// Closed-trip totals for one driver, optionally limited to trips whose
    /// start date falls inside the inclusive range. The range applies only
    /// when both ends are given.
    pub fn driver_performance(
        ledger: &Ledger,
        driver_name: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DriverPerformance {
        let (total_trips, total_profit, avg_profit) = performance(
            ledger
                .trips
                .iter()
                .filter(|trip| trip.driver_name == driver_name),
            date_from,
            date_to,
        );
        DriverPerformance {
            driver_name: driver_name.to_string(),
            total_trips,
            total_profit,
            avg_profit,
        }
    }

    /// Closed-trip totals for one vehicle, same range rules as
    /// [`ReportService::driver_performance`].
    pub fn vehicle_performance(
        ledger: &Ledger,
        vehicle_number: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> VehiclePerformance {
        let (total_trips, total_profit, avg_profit) = performance(
            ledger
                .trips
                .iter()
                .filter(|trip| trip.vehicle_number == vehicle_number),
            date_from,
            date_to,
        );
        VehiclePerformance {
            vehicle_number: vehicle_number.to_string(),
            total_trips,
            total_profit,
            avg_profit,
        }
    }

    /// Revenue/expense/profit totals over closed trips whose start date falls
    /// inside the inclusive range (whole history when no range is given).
    pub fn trip_report(
        ledger: &Ledger,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> TripReport {
        let mut report = TripReport::default();
        for trip in closed_trips(ledger) {
            if !started_in_range(trip, date_from, date_to) {
                continue;
            }
            report.total_trips += 1;
            report.total_revenue += trip.revenue;
            report.total_expenses += trip.total_expenses;
            report.total_profit += trip.profit;
        }
        report
    }

    /// Per-driver performance for every registered driver with at least one
    /// closed trip, best total profit first.
    pub fn driver_report(
        ledger: &Ledger,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Vec<DriverPerformance> {
        let mut rows: Vec<_> = ledger
            .drivers
            .iter()
            .map(|driver| Self::driver_performance(ledger, &driver.name, date_from, date_to))
            .filter(|row| row.total_trips > 0)
            .collect();
        rows.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));
        rows
    }

    /// Per-vehicle performance, best total profit first.
    pub fn vehicle_report(
        ledger: &Ledger,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Vec<VehiclePerformance> {
        let mut rows: Vec<_> = ledger
            .vehicles
            .iter()
            .map(|vehicle| {
                Self::vehicle_performance(ledger, &vehicle.vehicle_number, date_from, date_to)
            })
            .filter(|row| row.total_trips > 0)
            .collect();
        rows.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));
        rows
    }

    /// The most recently created trips, newest first.
    pub fn recent_trips(ledger: &Ledger, limit: usize) -> Vec<&Trip> {
        let mut trips: Vec<_> = ledger.trips.iter().collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        trips.truncate(limit);
        trips
    }

    /// Headline dashboard figures for the month and year of `reference`.
    pub fn dashboard_metrics(ledger: &Ledger, reference: NaiveDate) -> DashboardMetrics {
        let month0 = reference.month0();
        let year = reference.year();
        DashboardMetrics {
            monthly_profit: Self::monthly_profit(ledger, month0, year),
            yearly_profit: Self::yearly_profit(ledger, year),
            monthly_expenses: Self::monthly_expenses(ledger, month0, year),
            active_trips: Self::active_trips_count(ledger),
        }
    }

    /// Profit movement between the month of `reference` and the month before.
    pub fn monthly_profit_change(ledger: &Ledger, reference: NaiveDate) -> ProfitChange {
        let anchor = reference.year() as i64 * 12 + reference.month0() as i64;
        let previous_index = anchor - 1;
        let current = Self::monthly_profit(ledger, reference.month0(), reference.year());
        let previous = Self::monthly_profit(
            ledger,
            previous_index.rem_euclid(12) as u32,
            previous_index.div_euclid(12) as i32,
        );
        let change = current - previous;
        let change_percent = if previous != 0.0 {
            (change / previous) * 100.0
        } else {
            0.0
        };
        ProfitChange {
            current,
            previous,
            change,
            change_percent,
        }
    }
}

fn closed_trips(ledger: &Ledger) -> impl Iterator<Item = &Trip> {
    ledger
        .trips
        .iter()
        .filter(|trip| trip.status == TripStatus::Closed)
}

fn closed_in_month(ledger: &Ledger, month0: u32, year: i32) -> impl Iterator<Item = &Trip> {
    closed_trips(ledger).filter(move |trip| {
        let date = trip.accounting_date();
        date.month0() == month0 && date.year() == year
    })
}

fn started_in_range(trip: &Trip, date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> bool {
    match (date_from, date_to) {
        (Some(from), Some(to)) => trip
            .trip_start_date
            .map_or(false, |start| start >= from && start <= to),
        _ => true,
    }
}

fn performance<'a, I>(
    trips: I,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> (usize, f64, f64)
where
    I: Iterator<Item = &'a Trip>,
{
    let closed: Vec<_> = trips
        .filter(|trip| started_in_range(trip, date_from, date_to))
        .filter(|trip| trip.status == TripStatus::Closed)
        .collect();
    let total_trips = closed.len();
    let total_profit: f64 = closed.iter().map(|trip| trip.profit).sum();
    let avg_profit = if total_trips > 0 {
        total_profit / total_trips as f64
    } else {
        0.0
    };
    (total_trips, total_profit, avg_profit)
}

fn sane(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
