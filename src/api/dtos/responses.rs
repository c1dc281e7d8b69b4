use serde::Serialize;

use crate::domain::models::rule::{AvailabilityRule, RuleException};
use crate::domain::services::calendar::{DayAvailability, WorkingHours};

/// Public view of one stored weekly window, with exceptions decoded from
/// their storage column.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleView {
    pub id: String,
    pub day_of_week: i32,
    pub start_hour: f64,
    pub end_hour: f64,
    pub interval_minutes: i32,
    pub max_bookings: i32,
    pub active: bool,
    pub exceptions: Vec<RuleException>,
}

impl From<&AvailabilityRule> for RuleView {
    fn from(rule: &AvailabilityRule) -> Self {
        Self {
            id: rule.id.clone(),
            day_of_week: rule.weekday,
            start_hour: rule.start_hour,
            end_hour: rule.end_hour,
            interval_minutes: rule.slot_minutes,
            max_bookings: rule.max_bookings,
            active: rule.active,
            exceptions: rule.exceptions(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub availability: Vec<DayAvailability>,
    pub working_hours: WorkingHours,
}
