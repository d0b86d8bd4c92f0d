//! Overlap detection between clock ranges that may cross midnight.
//!
//! Both ranges are decomposed into half-open segments and compared pairwise,
//! so a range that wraps past midnight is checked against the evening and the
//! early-morning part independently. Ranges that only touch do not overlap.

use crate::error::Result;
use crate::model::Task;
use crate::time::{get_time_segments, ClockRange, Segment};

fn segments_overlap(a: &[Segment], b: &[Segment]) -> bool {
    a.iter().any(|&(a_start, a_end)| {
        b.iter()
            .any(|&(b_start, b_end)| a_start < b_end && b_start < a_end)
    })
}

/// Whether two `"HH:MM"` ranges overlap.
///
/// A zero-length range never overlaps anything.
///
/// # Errors
///
/// Returns [`crate::PlannerError::InvalidTime`] if any bound is malformed.
///
/// # Examples
///
/// ```
/// use timewheel_engine::conflict::do_time_ranges_overlap;
///
/// assert!(do_time_ranges_overlap("23:00", "01:00", "00:30", "02:00").unwrap());
/// assert!(!do_time_ranges_overlap("09:00", "10:00", "10:00", "11:00").unwrap());
/// ```
pub fn do_time_ranges_overlap(
    start_a: &str,
    end_a: &str,
    start_b: &str,
    end_b: &str,
) -> Result<bool> {
    let a = get_time_segments(start_a, end_a)?;
    let b = get_time_segments(start_b, end_b)?;
    Ok(segments_overlap(&a, &b))
}

/// Whether two validated ranges overlap.
pub fn ranges_overlap(a: &ClockRange, b: &ClockRange) -> bool {
    segments_overlap(&a.segments(), &b.segments())
}

/// Tasks in `tasks` whose range overlaps `range`, skipping `ignore_id`.
///
/// Tasks with malformed stored times are never reported.
pub fn overlapping_tasks<'a>(
    range: &ClockRange,
    tasks: &'a [Task],
    ignore_id: Option<&str>,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| Some(t.id.as_str()) != ignore_id)
        .filter(|t| t.range().is_some_and(|r| ranges_overlap(range, &r)))
        .collect()
}

/// Every pair of tasks in the list that overlap, by id, in list order.
pub fn find_overlapping_pairs(tasks: &[Task]) -> Vec<(String, String)> {
    let ranges: Vec<Option<ClockRange>> = tasks.iter().map(Task::range).collect();
    let mut pairs = Vec::new();
    for i in 0..tasks.len() {
        for j in (i + 1)..tasks.len() {
            if let (Some(a), Some(b)) = (&ranges[i], &ranges[j]) {
                if ranges_overlap(a, b) {
                    pairs.push((tasks[i].id.clone(), tasks[j].id.clone()));
                }
            }
        }
    }
    pairs
}

// ── Tests ───────────────────────────────────────────────────────────────────
