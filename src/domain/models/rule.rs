use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_SLOT_MINUTES: i32 = 15;
pub const MAX_SLOT_MINUTES: i32 = 240;

/// Dated override attached to a rule. Without `start` it targets every
/// occurrence the rule generates on that date; with `start` only the slot
/// beginning at that fractional hour.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleException {
    pub date: NaiveDate,
    pub start: Option<f64>,
    pub closed: bool,
    pub max_bookings: Option<i32>,
}

/// Incoming shape of one weekly window, as submitted by the shop.
/// Sunday (7) is never configurable.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub day_of_week: i32,
    pub start_hour: f64,
    pub end_hour: f64,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: i32,
    #[serde(default = "default_max_bookings")]
    pub max_bookings: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub exceptions: Vec<RuleException>,
}

fn default_interval_minutes() -> i32 {
    60
}

fn default_max_bookings() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

impl RuleDefinition {
    fn validate(&self) -> Result<(), String> {
        if !(1..=6).contains(&self.day_of_week) {
            return Err(format!(
                "dayOfWeek must be between 1 (Monday) and 6 (Saturday), got {}",
                self.day_of_week
            ));
        }
        if !(0.0..=23.5).contains(&self.start_hour) {
            return Err(format!("startHour out of range: {}", self.start_hour));
        }
        if !(0.5..=24.0).contains(&self.end_hour) {
            return Err(format!("endHour out of range: {}", self.end_hour));
        }
        if self.start_hour >= self.end_hour {
            return Err(format!(
                "startHour {} must be strictly before endHour {}",
                self.start_hour, self.end_hour
            ));
        }
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&self.interval_minutes) {
            return Err(format!(
                "intervalMinutes must be between {} and {}, got {}",
                MIN_SLOT_MINUTES, MAX_SLOT_MINUTES, self.interval_minutes
            ));
        }
        if self.max_bookings < 1 {
            return Err(format!("maxBookings must be at least 1, got {}", self.max_bookings));
        }
        Ok(())
    }
}

/// Validates every definition and rejects overlapping active windows on the
/// same weekday. Overlaps would make the capacity of a generated slot
/// ambiguous, so the whole set is refused instead of last-write-wins.
pub fn validate_definitions(defs: &[RuleDefinition]) -> Result<(), String> {
    for def in defs {
        def.validate()?;
    }

    let active: Vec<&RuleDefinition> = defs.iter().filter(|d| d.active).collect();
    for (i, a) in active.iter().enumerate() {
        for b in active.iter().skip(i + 1) {
            if a.day_of_week == b.day_of_week
                && a.start_hour < b.end_hour
                && b.start_hour < a.end_hour
            {
                return Err(format!(
                    "overlapping active windows on day {}: {}-{} and {}-{}",
                    a.day_of_week, a.start_hour, a.end_hour, b.start_hour, b.end_hour
                ));
            }
        }
    }
    Ok(())
}

/// One persisted weekly availability window for an offer.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    pub id: String,
    pub offer_id: i64,
    pub weekday: i32,
    pub start_hour: f64,
    pub end_hour: f64,
    pub slot_minutes: i32,
    pub max_bookings: i32,
    pub active: bool,
    pub exceptions_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityRule {
    pub fn from_definition(offer_id: i64, def: &RuleDefinition) -> Self {
        let exceptions_json = if def.exceptions.is_empty() {
            None
        } else {
            serde_json::to_string(&def.exceptions).ok()
        };

        Self {
            id: Uuid::new_v4().to_string(),
            offer_id,
            weekday: def.day_of_week,
            start_hour: def.start_hour,
            end_hour: def.end_hour,
            slot_minutes: def.interval_minutes,
            max_bookings: def.max_bookings,
            active: def.active,
            exceptions_json,
            created_at: Utc::now(),
        }
    }

    pub fn exceptions(&self) -> Vec<RuleException> {
        self.exceptions_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(day: i32, start: f64, end: f64) -> RuleDefinition {
        RuleDefinition {
            day_of_week: day,
            start_hour: start,
            end_hour: end,
            interval_minutes: 60,
            max_bookings: 1,
            active: true,
            exceptions: Vec::new(),
        }
    }

    #[test]
    fn accepts_disjoint_windows() {
        let defs = vec![def(1, 8.0, 12.0), def(1, 14.0, 18.0), def(2, 8.0, 12.0)];
        assert!(validate_definitions(&defs).is_ok());
    }

    #[test]
    fn rejects_sunday() {
        let defs = vec![def(7, 8.0, 12.0)];
        assert!(validate_definitions(&defs).is_err());
    }

    #[test]
    fn rejects_inverted_window() {
        let defs = vec![def(1, 12.0, 8.0)];
        assert!(validate_definitions(&defs).is_err());
    }

    #[test]
    fn rejects_bad_granularity() {
        let mut d = def(1, 8.0, 12.0);
        d.interval_minutes = 10;
        assert!(validate_definitions(&[d.clone()]).is_err());
        d.interval_minutes = 300;
        assert!(validate_definitions(&[d]).is_err());
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut d = def(1, 8.0, 12.0);
        d.max_bookings = 0;
        assert!(validate_definitions(&[d]).is_err());
    }

    #[test]
    fn rejects_overlapping_active_windows_same_day() {
        let defs = vec![def(1, 8.0, 12.0), def(1, 11.0, 15.0)];
        assert!(validate_definitions(&defs).is_err());
    }

    #[test]
    fn inactive_windows_may_overlap() {
        let mut shadow = def(1, 8.0, 12.0);
        shadow.active = false;
        let defs = vec![def(1, 8.0, 12.0), shadow];
        assert!(validate_definitions(&defs).is_ok());
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let defs = vec![def(1, 8.0, 12.0), def(1, 12.0, 16.0)];
        assert!(validate_definitions(&defs).is_ok());
    }

    #[test]
    fn exceptions_round_trip_through_json() {
        let mut d = def(1, 8.0, 10.0);
        d.exceptions = vec![RuleException {
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            start: Some(8.0),
            closed: true,
            max_bookings: None,
        }];
        let rule = AvailabilityRule::from_definition(42, &d);
        let parsed = rule.exceptions();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].closed);
        assert_eq!(parsed[0].start, Some(8.0));
    }
}
