//! Fleet domain models and the record container they live in.

pub mod driver;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod trip;
pub mod vehicle;

pub use driver::Driver;
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use trip::{Expenses, Trip, TripFields, TripStatus};
pub use vehicle::Vehicle;
