//! Clock-time arithmetic for day-planner tasks.
//!
//! A task's time is a wall-clock `"HH:MM"` pair with no date or timezone
//! attached. When the end precedes the start the range crosses midnight and
//! ends on the following day. Every overlap and duration computation in this
//! crate goes through [`time_segments`], which splits such a range into
//! half-open minute segments that never leave `0..1440`.
//!
//! # Functions
//!
//! - [`time_to_minutes`] / [`minutes_to_time`] — convert between `"HH:MM"` and minute offsets
//! - [`get_time_segments`] — decompose a range into `[start, end)` segments
//! - [`duration_minutes`] — total length of a range
//! - [`is_valid_time`] / [`is_valid_time_range`] — form validation
//! - [`is_time_in_range`] — whether a minute of the day falls inside a range

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Number of minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A half-open `[start, end)` interval in minutes from midnight.
pub type Segment = (u32, u32);

// ── Parsing and formatting ──────────────────────────────────────────────────

/// Parse `"HH:MM"` into minutes since midnight.
///
/// Accepts a one- or two-digit hour (`"9:05"` and `"09:05"`) and exactly two
/// minute digits, covering `00:00` through `23:59`.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidTime`] for anything else.
///
/// # Examples
///
/// ```
/// use timewheel_engine::time::time_to_minutes;
///
/// assert_eq!(time_to_minutes("14:30").unwrap(), 870);
/// assert!(time_to_minutes("24:00").is_err());
/// ```
pub fn time_to_minutes(time: &str) -> Result<u32> {
    parse_clock(time).ok_or_else(|| PlannerError::InvalidTime(time.to_string()))
}

/// Format a minute offset as `"HH:MM"`.
///
/// Any integer is accepted and wrapped into a single day, so negative values
/// land on the previous evening (`-15` → `"23:45"`) and values past midnight
/// land on the next morning (`1500` → `"01:00"`).
pub fn minutes_to_time(minutes: i64) -> String {
    let normalized = minutes.rem_euclid(MINUTES_PER_DAY as i64);
    format!("{:02}:{:02}", normalized / 60, normalized % 60)
}

/// Whether `time` is a well-formed clock time.
pub fn is_valid_time(time: &str) -> bool {
    parse_clock(time).is_some()
}

/// Whether `start`-`end` is usable as a task range: both well-formed and not equal.
pub fn is_valid_time_range(start: &str, end: &str) -> bool {
    match (parse_clock(start), parse_clock(end)) {
        (Some(s), Some(e)) => s != e,
        _ => false,
    }
}

fn parse_clock(s: &str) -> Option<u32> {
    let (hour, minute) = s.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let h: u32 = hour.parse().ok()?;
    let m: u32 = minute.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

// ── Segments ────────────────────────────────────────────────────────────────

/// Decompose a range given in minutes into half-open segments.
///
/// - `start == end` → no segments (zero-length range)
/// - `start < end` → `[start, end)`
/// - `start > end` → `[start, 1440)` and `[0, end)` (crosses midnight)
pub fn time_segments(start: u32, end: u32) -> Vec<Segment> {
    if start == end {
        Vec::new()
    } else if start < end {
        vec![(start, end)]
    } else {
        vec![(start, MINUTES_PER_DAY), (0, end)]
    }
}

/// Decompose an `"HH:MM"` range into half-open minute segments.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidTime`] if either bound is malformed.
pub fn get_time_segments(start: &str, end: &str) -> Result<Vec<Segment>> {
    Ok(time_segments(time_to_minutes(start)?, time_to_minutes(end)?))
}

/// Length of an `"HH:MM"` range in minutes, counting past midnight when it wraps.
pub fn duration_minutes(start: &str, end: &str) -> Result<u32> {
    Ok(get_time_segments(start, end)?
        .iter()
        .map(|(s, e)| e - s)
        .sum())
}

/// Whether `minute_of_day` falls inside `start`-`end` (end exclusive).
pub fn is_time_in_range(minute_of_day: u32, start: &str, end: &str) -> Result<bool> {
    let minute = minute_of_day % MINUTES_PER_DAY;
    Ok(get_time_segments(start, end)?
        .iter()
        .any(|&(s, e)| s <= minute && minute < e))
}

// ── ClockRange ──────────────────────────────────────────────────────────────

/// A validated, non-empty clock range.
///
/// `end < start` means the range ends on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockRange {
    pub start: u32,
    pub end: u32,
}

impl ClockRange {
    /// Build a range from minute offsets.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidTimeRange`] if either bound is outside
    /// `0..1440` or the bounds are equal.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start >= MINUTES_PER_DAY || end >= MINUTES_PER_DAY || start == end {
            return Err(PlannerError::InvalidTimeRange {
                start: minutes_to_time(start as i64),
                end: minutes_to_time(end as i64),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a pair of `"HH:MM"` strings.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidTimeRange`] if either string is malformed
    /// or both name the same minute.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        match (parse_clock(start), parse_clock(end)) {
            (Some(s), Some(e)) if s != e => Ok(Self { start: s, end: e }),
            _ => Err(PlannerError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            }),
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    pub fn segments(&self) -> Vec<Segment> {
        time_segments(self.start, self.end)
    }

    pub fn duration(&self) -> u32 {
        self.segments().iter().map(|(s, e)| e - s).sum()
    }

    /// The range as one contiguous span, with the end pushed past 1440 when it wraps.
    pub fn span(&self) -> (u32, u32) {
        if self.crosses_midnight() {
            (self.start, self.end + MINUTES_PER_DAY)
        } else {
            (self.start, self.end)
        }
    }

    pub fn start_time(&self) -> String {
        minutes_to_time(self.start as i64)
    }

    pub fn end_time(&self) -> String {
        minutes_to_time(self.end as i64)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes_basic() {
        assert_eq!(time_to_minutes("00:00").unwrap(), 0);
        assert_eq!(time_to_minutes("09:05").unwrap(), 545);
        assert_eq!(time_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_time_to_minutes_single_digit_hour() {
        assert_eq!(time_to_minutes("9:05").unwrap(), 545);
    }

    #[test]
    fn test_time_to_minutes_rejects_malformed() {
        for bad in ["", "24:00", "12:60", "9:5", "123:00", "ab:cd", "12-30", "12:30:00", " 12:30"] {
            let err = time_to_minutes(bad).unwrap_err();
            assert!(err.to_string().contains("Invalid time"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_minutes_to_time_pads() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(545), "09:05");
        assert_eq!(minutes_to_time(1439), "23:59");
    }

    #[test]
    fn test_minutes_to_time_wraps_negative() {
        assert_eq!(minutes_to_time(-15), "23:45");
        assert_eq!(minutes_to_time(-1440), "00:00");
    }

    #[test]
    fn test_minutes_to_time_wraps_past_midnight() {
        assert_eq!(minutes_to_time(1440), "00:00");
        assert_eq!(minutes_to_time(1500), "01:00");
    }

    #[test]
    fn test_segments_same_day() {
        assert_eq!(get_time_segments("09:00", "10:30").unwrap(), vec![(540, 630)]);
    }

    #[test]
    fn test_segments_cross_midnight() {
        assert_eq!(
            get_time_segments("23:00", "01:00").unwrap(),
            vec![(1380, 1440), (0, 60)]
        );
    }

    #[test]
    fn test_segments_zero_length_is_empty() {
        assert!(get_time_segments("12:00", "12:00").unwrap().is_empty());
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(duration_minutes("09:00", "10:30").unwrap(), 90);
        assert_eq!(duration_minutes("22:30", "00:15").unwrap(), 105);
        assert_eq!(duration_minutes("00:00", "23:59").unwrap(), 1439);
        assert_eq!(duration_minutes("08:00", "08:00").unwrap(), 0);
    }

    #[test]
    fn test_valid_time_range() {
        assert!(is_valid_time_range("09:00", "10:00"));
        assert!(is_valid_time_range("23:00", "01:00"));
        assert!(!is_valid_time_range("09:00", "09:00"));
        assert!(!is_valid_time_range("9:00", "09:00"));
        assert!(!is_valid_time_range("09:00", "25:00"));
    }

    #[test]
    fn test_time_in_range_half_open() {
        assert!(is_time_in_range(540, "09:00", "10:00").unwrap());
        assert!(!is_time_in_range(600, "09:00", "10:00").unwrap());
    }

    #[test]
    fn test_time_in_range_overnight() {
        assert!(is_time_in_range(1410, "23:00", "01:00").unwrap());
        assert!(is_time_in_range(30, "23:00", "01:00").unwrap());
        assert!(!is_time_in_range(60, "23:00", "01:00").unwrap());
        assert!(!is_time_in_range(720, "23:00", "01:00").unwrap());
    }

    #[test]
    fn test_clock_range_parse_rejects_equal_bounds() {
        let err = ClockRange::parse("10:00", "10:00").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidTimeRange);
    }

    #[test]
    fn test_clock_range_new_rejects_out_of_day() {
        assert!(ClockRange::new(0, 1440).is_err());
        assert!(ClockRange::new(1380, 60).is_ok());
    }

    #[test]
    fn test_clock_range_span_extends_wrapping_end() {
        let range = ClockRange::parse("22:00", "02:00").unwrap();
        assert!(range.crosses_midnight());
        assert_eq!(range.span(), (1320, 1560));
        assert_eq!(range.duration(), 240);
        assert_eq!(range.start_time(), "22:00");
        assert_eq!(range.end_time(), "02:00");
    }
}
