//! Single-task edits against one day: add, update, delete.
//!
//! Every operation validates first and only then builds the new [`Day`], so a
//! rejected edit never leaves a partially updated day behind. The input is
//! never modified; callers receive a fresh value to persist.
//!
//! # Overlap handling
//!
//! By default an edit whose range overlaps another task on the same day is
//! rejected with [`PlannerError::OverlapConflict`]. With
//! [`EditOptions::allow_overlap`] set, [`add_task`] instead trims its
//! neighbours so the day stays free of overlaps:
//!
//! - a neighbour that starts outside the new range keeps only the part
//!   before the new start
//! - a neighbour that starts inside the new range keeps only the part after
//!   the new end, if any
//! - anything left with no time is removed
//!
//! [`update_task`] only trims when [`EngineConfig::trim_on_update`] is set;
//! otherwise an allowed overlap is written as-is.

use serde::{Deserialize, Serialize};

use crate::conflict::{overlapping_tasks, ranges_overlap};
use crate::error::{PlannerError, Result};
use crate::ids::IdGenerator;
use crate::model::{Day, Task, TaskForm};
use crate::time::{ClockRange, MINUTES_PER_DAY};

/// Engine-wide behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trim neighbours on `update_task` with `allow_overlap`, as `add_task` does.
    pub trim_on_update: bool,
}

/// Per-edit options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Resolve overlaps instead of rejecting the edit.
    pub allow_overlap: bool,
}

impl EditOptions {
    pub fn allow_overlap() -> Self {
        Self {
            allow_overlap: true,
        }
    }
}

// ── Day-level operations ────────────────────────────────────────────────────

/// Add a task built from `form` to `day`.
///
/// The new task is appended after the existing (possibly trimmed) tasks and
/// receives an id from `ids`.
///
/// # Errors
///
/// - [`PlannerError::EmptyTitle`] if the title is blank
/// - [`PlannerError::InvalidTimeRange`] if the times are malformed or equal
/// - [`PlannerError::OverlapConflict`] if the range overlaps an existing task
///   and `options.allow_overlap` is false
pub fn add_task(
    day: &Day,
    form: TaskForm,
    options: EditOptions,
    ids: &mut impl IdGenerator,
) -> Result<Day> {
    let range = form.validate()?;

    let mut tasks = if options.allow_overlap {
        trim_around(&day.tasks, &range, None)
    } else {
        reject_overlap(&range, &day.tasks, None)?;
        day.tasks.clone()
    };

    let task = form.into_task(ids.next_id(), &day.date);
    tracing::debug!(date = %day.date, id = %task.id, "task added");
    tasks.push(task);

    Ok(Day {
        tasks,
        ..day.clone()
    })
}

/// Replace the title, times, category, and color of task `task_id` in place.
///
/// Overlap checks skip the task being edited. Its id, date, and calendar link
/// are kept.
///
/// # Errors
///
/// Same validation errors as [`add_task`], plus [`PlannerError::TaskNotFound`]
/// if `day` holds no task with that id.
pub fn update_task(
    day: &Day,
    task_id: &str,
    form: TaskForm,
    options: EditOptions,
    config: &EngineConfig,
) -> Result<Day> {
    let range = form.validate()?;
    if day.task(task_id).is_none() {
        return Err(PlannerError::TaskNotFound(task_id.to_string()));
    }

    let tasks = if !options.allow_overlap {
        reject_overlap(&range, &day.tasks, Some(task_id))?;
        day.tasks.clone()
    } else if config.trim_on_update {
        trim_around(&day.tasks, &range, Some(task_id))
    } else {
        day.tasks.clone()
    };

    let tasks = tasks
        .into_iter()
        .map(|task| {
            if task.id == task_id {
                Task {
                    title: form.title.clone(),
                    start_time: form.start_time.clone(),
                    end_time: form.end_time.clone(),
                    category: form.category.clone(),
                    color: form.color.clone(),
                    ..task
                }
            } else {
                task
            }
        })
        .collect();

    tracing::debug!(date = %day.date, id = task_id, "task updated");
    Ok(Day {
        tasks,
        ..day.clone()
    })
}

/// Remove task `task_id` from `day`. Removing an absent id is a no-op.
pub fn delete_task(day: &Day, task_id: &str) -> Day {
    Day {
        tasks: day
            .tasks
            .iter()
            .filter(|t| t.id != task_id)
            .cloned()
            .collect(),
        ..day.clone()
    }
}

// ── Snapshot-level operations ───────────────────────────────────────────────

/// [`add_task`] on the day dated `date`, creating an empty day if none exists.
///
/// # Errors
///
/// [`PlannerError::InvalidDate`] for a malformed date, then the errors of
/// [`add_task`].
pub fn add_task_on(
    days: &[Day],
    date: &str,
    form: TaskForm,
    options: EditOptions,
    ids: &mut impl IdGenerator,
) -> Result<Vec<Day>> {
    crate::calendar::parse_iso_date(date)?;
    match days.iter().position(|d| d.date == date) {
        Some(index) => {
            let updated = add_task(&days[index], form, options, ids)?;
            let mut next = days.to_vec();
            next[index] = updated;
            Ok(next)
        }
        None => {
            let created = add_task(&Day::empty(date), form, options, ids)?;
            let mut next = days.to_vec();
            next.push(created);
            Ok(next)
        }
    }
}

/// [`update_task`] on the day dated `date`.
///
/// # Errors
///
/// [`PlannerError::TaskNotFound`] if there is no day for `date`, then the
/// errors of [`update_task`].
pub fn update_task_on(
    days: &[Day],
    date: &str,
    task_id: &str,
    form: TaskForm,
    options: EditOptions,
    config: &EngineConfig,
) -> Result<Vec<Day>> {
    let index = days
        .iter()
        .position(|d| d.date == date)
        .ok_or_else(|| PlannerError::TaskNotFound(task_id.to_string()))?;
    let updated = update_task(&days[index], task_id, form, options, config)?;
    let mut next = days.to_vec();
    next[index] = updated;
    Ok(next)
}

/// [`delete_task`] on the day dated `date`; a missing day is a no-op.
pub fn delete_task_on(days: &[Day], date: &str, task_id: &str) -> Vec<Day> {
    days.iter()
        .map(|d| {
            if d.date == date {
                delete_task(d, task_id)
            } else {
                d.clone()
            }
        })
        .collect()
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn reject_overlap(range: &ClockRange, tasks: &[Task], ignore_id: Option<&str>) -> Result<()> {
    if let Some(existing) = overlapping_tasks(range, tasks, ignore_id).first() {
        tracing::debug!(
            start = %range.start_time(),
            end = %range.end_time(),
            conflicting_id = %existing.id,
            "overlap rejected"
        );
        return Err(PlannerError::OverlapConflict {
            start: range.start_time(),
            end: range.end_time(),
            conflicting_id: existing.id.clone(),
        });
    }
    Ok(())
}

/// Shorten or drop every task overlapping `range`, keeping list order.
fn trim_around(tasks: &[Task], range: &ClockRange, ignore_id: Option<&str>) -> Vec<Task> {
    let mut kept = Vec::with_capacity(tasks.len());
    for task in tasks {
        let existing = match task.range() {
            Some(existing) if Some(task.id.as_str()) != ignore_id => existing,
            _ => {
                kept.push(task.clone());
                continue;
            }
        };
        if !ranges_overlap(range, &existing) {
            kept.push(task.clone());
            continue;
        }
        match trim_range(&existing, range) {
            Some(trimmed) => {
                tracing::trace!(
                    id = %task.id,
                    from = %format!("{}-{}", task.start_time, task.end_time),
                    to = %format!("{}-{}", trimmed.start_time(), trimmed.end_time()),
                    "task trimmed"
                );
                kept.push(Task {
                    start_time: trimmed.start_time(),
                    end_time: trimmed.end_time(),
                    ..task.clone()
                });
            }
            None => tracing::trace!(id = %task.id, "task dropped"),
        }
    }
    kept
}

/// The part of `existing` that survives inserting `new`, on the 24-hour circle.
///
/// Assumes the two ranges overlap.
fn trim_range(existing: &ClockRange, new: &ClockRange) -> Option<ClockRange> {
    let starts_inside_new = contains(new, existing.start);
    if !starts_inside_new {
        // Walking forward from its start, `existing` first meets `new` at new.start.
        return ClockRange::new(existing.start, new.start).ok();
    }
    let to_new_end = forward_distance(existing.start, new.end);
    if existing.duration() <= to_new_end {
        return None;
    }
    // A long enough task wraps back into `new`; stop the tail at new.start.
    let tail_end = if forward_distance(new.end, existing.end) <= forward_distance(new.end, new.start)
    {
        existing.end
    } else {
        new.start
    };
    ClockRange::new(new.end, tail_end).ok()
}

fn contains(range: &ClockRange, minute: u32) -> bool {
    range
        .segments()
        .iter()
        .any(|&(s, e)| s <= minute && minute < e)
}

fn forward_distance(from: u32, to: u32) -> u32 {
    (to + MINUTES_PER_DAY - from) % MINUTES_PER_DAY
}

// ── Tests ───────────────────────────────────────────────────────────────────
