//! Pure trip arithmetic. No state, no side effects, never panics.

use crate::ledger::Expenses;

/// Revenue for a load: tonnage times the agreed rate per ton.
///
/// Returns 0 when either figure is missing, not finite, or not positive.
/// The advance handed to the driver is disbursed out of this amount and is
/// never added on top of it.
pub fn revenue(tonnage: Option<f64>, rate_per_ton: Option<f64>) -> f64 {
    match (tonnage, rate_per_ton) {
        (Some(tonnage), Some(rate)) if valid_amount(tonnage) && valid_amount(rate) => {
            tonnage * rate
        }
        _ => 0.0,
    }
}

/// Sum of the six expense sheet entries, treating anything unusable as 0.
pub fn total_expenses(expenses: Option<&Expenses>) -> f64 {
    let Some(expenses) = expenses else {
        return 0.0;
    };
    expenses
        .entries()
        .iter()
        .map(|(_, amount)| if amount.is_finite() { *amount } else { 0.0 })
        .sum()
}

/// Profit once revenue and expenses are both on the books.
///
/// Returns 0 when either amount is zero or not finite; the subtraction only
/// happens with two non-zero figures.
pub fn profit(revenue: f64, total_expenses: f64) -> f64 {
    if !revenue.is_finite() || !total_expenses.is_finite() {
        return 0.0;
    }
    if revenue == 0.0 || total_expenses == 0.0 {
        return 0.0;
    }
    revenue - total_expenses
}

fn valid_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_is_tonnage_times_rate() {
        assert_eq!(revenue(Some(10.0), Some(650.0)), 6500.0);
        assert_eq!(revenue(Some(7.5), Some(800.0)), 6000.0);
    }

    #[test]
    fn revenue_guards_missing_and_non_positive_inputs() {
        assert_eq!(revenue(None, Some(650.0)), 0.0);
        assert_eq!(revenue(Some(10.0), None), 0.0);
        assert_eq!(revenue(Some(0.0), Some(650.0)), 0.0);
        assert_eq!(revenue(Some(-3.0), Some(650.0)), 0.0);
        assert_eq!(revenue(Some(f64::NAN), Some(650.0)), 0.0);
    }

    #[test]
    fn total_expenses_sums_all_entries() {
        let expenses = Expenses {
            food: 200.0,
            diesel: 1500.0,
            toll: 300.0,
            salary: 800.0,
            gst: 0.0,
            other: 0.0,
            other_description: None,
        };
        assert_eq!(total_expenses(Some(&expenses)), 2800.0);
        assert_eq!(total_expenses(None), 0.0);
    }

    #[test]
    fn total_expenses_ignores_non_finite_entries() {
        let expenses = Expenses {
            diesel: f64::INFINITY,
            toll: 120.0,
            ..Expenses::default()
        };
        assert_eq!(total_expenses(Some(&expenses)), 120.0);
    }

    #[test]
    fn profit_subtracts_when_both_sides_are_non_zero() {
        assert_eq!(profit(6500.0, 2800.0), 3700.0);
        assert_eq!(profit(2000.0, 2500.0), -500.0);
    }

    #[test]
    fn profit_short_circuits_on_zero_operands() {
        assert_eq!(profit(6500.0, 0.0), 0.0);
        assert_eq!(profit(0.0, 2800.0), 0.0);
        assert_eq!(profit(f64::NAN, 2800.0), 0.0);
    }
}
