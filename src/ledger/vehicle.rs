use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A truck in the fleet, keyed by its registration number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_driver_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(vehicle_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_number: vehicle_number.into(),
            current_driver_name: None,
            created_at: Utc::now(),
        }
    }
}
