//! Data types for the thermostat schedule.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One stored row of the schedule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleEntry {
    /// Store-assigned id, fixed at insert time.
    pub id: i64,
    pub day: String,
    pub hour: String,
    pub temperature: String,
}

impl ScheduleEntry {
    /// The non-key fields of this entry.
    #[must_use]
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            day: self.day.clone(),
            hour: self.hour.clone(),
            temperature: self.temperature.clone(),
        }
    }
}

/// Values for `add` and `update`; the id is never supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntryFields {
    pub day: String,
    pub hour: String,
    pub temperature: String,
}

impl EntryFields {
    #[must_use]
    pub fn new(day: impl Into<String>, hour: impl Into<String>, temperature: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            hour: hour.into(),
            temperature: temperature.into(),
        }
    }

    /// Values in schedule table column order.
    #[must_use]
    pub fn as_values(&self) -> [&str; 3] {
        [self.day.as_str(), self.hour.as_str(), self.temperature.as_str()]
    }

    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: i64) -> ScheduleEntry {
        ScheduleEntry {
            id,
            day: self.day,
            hour: self.hour,
            temperature: self.temperature,
        }
    }
}
