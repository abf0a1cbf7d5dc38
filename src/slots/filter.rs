use chrono::{DateTime, FixedOffset, Timelike};

use super::types::SlotRecord;

/// Store lookup key: weekday, half-hour slot and optional vehicle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub day_of_week: String,
    pub timestamp: String,
    pub vehicle_type: Option<String>,
}

impl SlotQuery {
    /// Query for the half-hour containing `at`, in `at`'s own timezone.
    pub fn at(at: &DateTime<FixedOffset>, vehicle_type: Option<String>) -> Self {
        Self {
            day_of_week: at.format("%A").to_string(),
            timestamp: round_to_half_hour(at),
            vehicle_type,
        }
    }

    pub fn matches(&self, record: &SlotRecord) -> bool {
        if record.day_of_week != self.day_of_week || record.timestamp != self.timestamp {
            return false;
        }
        match self.vehicle_type {
            Some(ref wanted) => record.vehicle_type.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// Floor a time to its half-hour slot, formatted "HH:MM".
pub fn round_to_half_hour<T: Timelike>(time: &T) -> String {
    let minute = if time.minute() < 30 { 0 } else { 30 };
    format!("{:02}:{:02}", time.hour(), minute)
}

/// Rows matching the query, in store order.
pub fn filter_slots<'a>(slots: &'a [SlotRecord], query: &SlotQuery) -> Vec<&'a SlotRecord> {
    slots.iter().filter(|s| query.matches(s)).collect()
}
