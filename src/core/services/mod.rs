pub mod fleet_service;
pub mod report_service;
pub mod trip_service;

pub use fleet_service::FleetService;
pub use report_service::{
    DashboardMetrics, DriverPerformance, ExpenseBreakdown, MonthlyProfitPoint, ProfitChange,
    ReportService, StatusDistribution, TripReport, VehiclePerformance,
};
pub use trip_service::TripService;

use uuid::Uuid;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("validation failed for `{field}`: {reason}")]
    Validation { field: String, reason: String },
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),
    #[error("driver not found: {0}")]
    DriverNotFound(String),
    #[error("invalid state: {0}")]
    State(String),
}

impl ServiceError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        ServiceError::State(message.into())
    }
}
