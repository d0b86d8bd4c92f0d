//! ISO calendar dates, weekday ids, and target-date ranges.
//!
//! Dates travel through the engine as `YYYY-MM-DD` strings so they compare and
//! sort lexically. They are parsed into `chrono::NaiveDate` only when the
//! calendar itself matters: weekday lookup, day-of-month lookup, and
//! building ranges of dates from an anchor.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

// ── ISO dates ───────────────────────────────────────────────────────────────

/// Parse a strict `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDate`] for any other shape or for dates
/// that do not exist (e.g. `2025-02-30`).
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(PlannerError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| PlannerError::InvalidDate(s.to_string()))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day-of-month number (1-31) of an ISO date.
pub fn day_of_month(s: &str) -> Result<u32> {
    Ok(parse_iso_date(s)?.day())
}

/// De-duplicate and sort target dates, dropping any that do not parse.
pub fn normalize_target_dates<S: AsRef<str>>(dates: &[S]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for date in dates {
        let date = date.as_ref();
        if parse_iso_date(date).is_ok() {
            unique.insert(date.to_string());
        } else {
            tracing::warn!(date, "dropping malformed target date");
        }
    }
    unique.into_iter().collect()
}

// ── Weekday ids ─────────────────────────────────────────────────────────────

/// Per-day key of a week template, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayId {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekdayId {
    pub const ALL: [WeekdayId; 7] = [
        WeekdayId::Monday,
        WeekdayId::Tuesday,
        WeekdayId::Wednesday,
        WeekdayId::Thursday,
        WeekdayId::Friday,
        WeekdayId::Saturday,
        WeekdayId::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayId::Monday => "monday",
            WeekdayId::Tuesday => "tuesday",
            WeekdayId::Wednesday => "wednesday",
            WeekdayId::Thursday => "thursday",
            WeekdayId::Friday => "friday",
            WeekdayId::Saturday => "saturday",
            WeekdayId::Sunday => "sunday",
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for WeekdayId {
    fn from(weekday: Weekday) -> Self {
        WeekdayId::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for WeekdayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday id of an ISO date.
pub fn weekday_id(date: &str) -> Result<WeekdayId> {
    Ok(WeekdayId::of(parse_iso_date(date)?))
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

// ── Target ranges ───────────────────────────────────────────────────────────

/// Preset sets of dates a template can be applied to, relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRange {
    /// Only the anchor date.
    #[default]
    SelectedDay,
    /// The anchor and the six days after it.
    Next7Days,
    /// Monday through Sunday of the anchor's week.
    CurrentWeek,
    /// 28 days starting on the Monday of the anchor's week.
    Next4Weeks,
    /// Every day of the anchor's month.
    CurrentMonth,
}

impl TargetRange {
    /// Expand into ISO dates, in ascending order.
    pub fn dates(&self, anchor: NaiveDate) -> Vec<String> {
        let run = |first: NaiveDate, count: i64| -> Vec<String> {
            (0..count)
                .map(|offset| format_iso_date(first + Duration::days(offset)))
                .collect()
        };

        match self {
            TargetRange::SelectedDay => vec![format_iso_date(anchor)],
            TargetRange::Next7Days => run(anchor, 7),
            TargetRange::CurrentWeek => run(start_of_week(anchor), 7),
            TargetRange::Next4Weeks => run(start_of_week(anchor), 28),
            TargetRange::CurrentMonth => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                run(first, days_in_month(first) as i64)
            }
        }
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

// ── Tests ───────────────────────────────────────────────────────────────────
