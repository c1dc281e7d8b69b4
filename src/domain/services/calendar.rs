use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use crate::domain::models::rule::AvailabilityRule;
use crate::domain::services::availability::{Slot, SUNDAY};

pub const DEFAULT_OPENING_HOUR: u32 = 8;
pub const DEFAULT_CLOSING_HOUR: u32 = 19;
pub const DEFAULT_INTERVAL_MINUTES: i32 = 60;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HourBucket {
    pub hour: u32,
    pub available: bool,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub day_of_week: i32,
    pub slots: Vec<HourBucket>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    pub start: u32,
    pub end: u32,
    pub interval: i32,
}

/// The hour envelope the calendar renders. Defaults to 08:00-19:00 at 60
/// minutes; when a pattern exists it tightens to the materialized rules,
/// and `interval` reports the finest configured granularity.
pub fn working_hours(rules: &[AvailabilityRule], slots: &[Slot]) -> WorkingHours {
    if slots.is_empty() {
        return WorkingHours {
            start: DEFAULT_OPENING_HOUR,
            end: DEFAULT_CLOSING_HOUR,
            interval: DEFAULT_INTERVAL_MINUTES,
        };
    }

    let start = slots.iter().map(|s| s.start.hour()).min().unwrap_or(DEFAULT_OPENING_HOUR);
    let end = slots.iter().map(|s| s.start.hour() + 1).max().unwrap_or(DEFAULT_CLOSING_HOUR);
    let interval = rules
        .iter()
        .filter(|r| r.active)
        .map(|r| r.slot_minutes)
        .min()
        .unwrap_or(DEFAULT_INTERVAL_MINUTES);

    WorkingHours { start, end, interval }
}

/// Read-only merge of materialized slots with active-booking counts into a
/// per-day, per-hour calendar. An hour is available when any slot starting
/// within it still has spare capacity. Sundays are omitted entirely.
pub fn build_calendar(
    slots: &[Slot],
    active_counts: &HashMap<(NaiveDate, NaiveTime), i64>,
    range_start: NaiveDate,
    range_end: NaiveDate,
    hours: &WorkingHours,
) -> Vec<DayAvailability> {
    let mut days = Vec::new();
    if range_end < range_start {
        return days;
    }

    let mut date = range_start;
    loop {
        let day_of_week = date.weekday().number_from_monday() as i32;
        if day_of_week != SUNDAY {
            let day_slots: Vec<&Slot> = slots.iter().filter(|s| s.date == date).collect();

            let buckets = (hours.start..hours.end)
                .map(|hour| {
                    let available = day_slots.iter().any(|s| {
                        let booked = active_counts
                            .get(&(s.date, s.start))
                            .copied()
                            .unwrap_or(0);
                        s.start.hour() == hour && booked < s.capacity as i64
                    });
                    HourBucket { hour, available }
                })
                .collect();

            days.push(DayAvailability {
                date,
                day_of_week,
                slots: buckets,
            });
        }

        if date >= range_end {
            break;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    days
}
