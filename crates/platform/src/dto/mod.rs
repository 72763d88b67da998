//! Wire types for the platform REST collections. Read side structs keep
//! every field optional so a sparse payload degrades to missing cells
//! instead of a deserialization failure.

pub mod alarm;
pub mod event;
pub mod inventory;
pub mod measurement;

use serde::{Deserialize, Serialize};

pub use alarm::{AlarmDto, AlarmPage, NewAlarmDto};
pub use event::{EventDto, EventPage, NewEventDto};
pub use inventory::{ManagedObjectDto, ManagedObjectPage};
pub use measurement::{MeasurementDto, MeasurementPage, NewMeasurementDto};

/// Reference to the managed object an item belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SourceRef {
    pub fn by_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: None,
        }
    }
}
