//! Read-only views over a day: ordering, load, and what is on now.
//!
//! The current minute is always passed in; nothing here reads a clock.

use serde::Serialize;

use crate::model::{Day, Task};
use crate::time::{is_time_in_range, time_to_minutes, MINUTES_PER_DAY};

/// Tasks ordered by start time; ties and malformed times keep list order.
pub fn sorted_tasks(day: &Day) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = day.tasks.iter().collect();
    tasks.sort_by_key(|t| time_to_minutes(&t.start_time).unwrap_or(u32::MAX));
    tasks
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub task_count: usize,
    /// Scheduled minutes, counting overnight tasks in full.
    pub total_minutes: u32,
    /// Share of the 24 hours that is scheduled, capped at 100.
    pub load_percent: f64,
}

pub fn day_stats(day: &Day) -> DayStats {
    let total_minutes: u32 = day
        .tasks
        .iter()
        .filter_map(Task::range)
        .map(|r| r.duration())
        .sum();
    let load_percent = (total_minutes as f64 / MINUTES_PER_DAY as f64 * 100.0).min(100.0);
    DayStats {
        task_count: day.tasks.len(),
        total_minutes,
        load_percent,
    }
}

/// The task running at `minute_of_day`, if any.
pub fn current_task(day: &Day, minute_of_day: u32) -> Option<&Task> {
    sorted_tasks(day).into_iter().find(|t| {
        is_time_in_range(minute_of_day, &t.start_time, &t.end_time).unwrap_or(false)
    })
}

/// The first task starting strictly after `minute_of_day`.
pub fn next_task(day: &Day, minute_of_day: u32) -> Option<&Task> {
    sorted_tasks(day)
        .into_iter()
        .find(|t| time_to_minutes(&t.start_time).is_ok_and(|start| start > minute_of_day))
}
