use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::domain::models::rule::{AvailabilityRule, RuleException};

pub const SUNDAY: i32 = 7;

/// One concrete bookable (date, time) instance derived from a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub capacity: i32,
}

fn hour_to_minutes(hour: f64) -> u32 {
    (hour * 60.0).round().max(0.0) as u32
}

fn minutes_to_time(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

fn exception_for<'a>(
    exceptions: &'a [RuleException],
    date: NaiveDate,
    start_minutes: u32,
) -> Option<&'a RuleException> {
    exceptions.iter().find(|e| {
        e.date == date
            && e.start
                .is_none_or(|s| hour_to_minutes(s) == start_minutes)
    })
}

/// Expands a rule set into the ordered sequence of candidate slots for every
/// date in [range_start, range_end] inclusive. Pure and deterministic: it
/// knows nothing about existing bookings. Sunday never yields slots, a final
/// partial step is excluded, and an inverted range yields an empty sequence.
pub fn materialize(
    rules: &[AvailabilityRule],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    if range_end < range_start {
        return slots;
    }

    let mut date = range_start;
    loop {
        let weekday = date.weekday().number_from_monday() as i32;
        if weekday != SUNDAY {
            for rule in rules.iter().filter(|r| r.active && r.weekday == weekday) {
                if rule.slot_minutes <= 0 {
                    continue;
                }
                let exceptions = rule.exceptions();
                let start_min = hour_to_minutes(rule.start_hour);
                let end_min = hour_to_minutes(rule.end_hour);
                let step = rule.slot_minutes as u32;

                let mut cursor = start_min;
                while cursor + step <= end_min {
                    let exception = exception_for(&exceptions, date, cursor);
                    if !exception.is_some_and(|e| e.closed)
                        && let Some(start) = minutes_to_time(cursor)
                    {
                        let capacity = exception
                            .and_then(|e| e.max_bookings)
                            .unwrap_or(rule.max_bookings);
                        slots.push(Slot { date, start, capacity });
                    }
                    cursor += step;
                }
            }
        }

        if date >= range_end {
            break;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    slots.sort_by(|a, b| (a.date, a.start).cmp(&(b.date, b.start)));
    slots
}

/// The materialized slot matching an exact (date, time), if any. This is the
/// slot-existence check the booking flow runs before touching the ledger.
pub fn find_slot(rules: &[AvailabilityRule], date: NaiveDate, start: NaiveTime) -> Option<Slot> {
    materialize(rules, date, date)
        .into_iter()
        .find(|s| s.start == start)
}
