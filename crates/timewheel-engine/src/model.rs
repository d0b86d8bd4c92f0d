//! The Day → Task entity graph.
//!
//! A snapshot is a `Vec<Day>` with at most one [`Day`] per ISO date. Each day
//! exclusively owns its tasks, kept in insertion order. Field names on the
//! wire are camelCase to match the stored JSON documents.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::time::ClockRange;

/// A scheduled block of time on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// ISO date (`YYYY-MM-DD`) of the owning day.
    pub date: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub color: String,
    /// Id of the mirrored event in the external calendar, once synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
}

impl Task {
    /// Parsed time range, or `None` if the stored times are malformed.
    pub fn range(&self) -> Option<ClockRange> {
        ClockRange::parse(&self.start_time, &self.end_time).ok()
    }
}

/// User-entered fields for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub color: String,
}

impl TaskForm {
    pub fn new(title: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            title: title.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            category: "custom".to_string(),
            color: "#4CAF50".to_string(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Check title and time range, returning the parsed range.
    ///
    /// # Errors
    ///
    /// [`PlannerError::EmptyTitle`] for a blank title, then
    /// [`PlannerError::InvalidTimeRange`] for malformed or equal times.
    pub fn validate(&self) -> Result<ClockRange> {
        if self.title.trim().is_empty() {
            return Err(PlannerError::EmptyTitle);
        }
        ClockRange::parse(&self.start_time, &self.end_time)
    }

    pub(crate) fn into_task(self, id: String, date: &str) -> Task {
        Task {
            id,
            date: date.to_string(),
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            color: self.color,
            calendar_event_id: None,
        }
    }
}

/// A task pattern inside a template: a [`Task`] without id, date, or calendar link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateTask {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub color: String,
}

impl TemplateTask {
    pub fn range(&self) -> Option<ClockRange> {
        ClockRange::parse(&self.start_time, &self.end_time).ok()
    }

    /// Bind the pattern to a concrete date under a fresh id.
    pub fn materialize(&self, id: String, date: &str) -> Task {
        Task {
            id,
            date: date.to_string(),
            title: self.title.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            category: self.category.clone(),
            color: self.color.clone(),
            calendar_event_id: None,
        }
    }
}

impl From<&Task> for TemplateTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            start_time: task.start_time.clone(),
            end_time: task.end_time.clone(),
            category: task.category.clone(),
            color: task.color.clone(),
        }
    }
}

impl From<TaskForm> for TemplateTask {
    fn from(form: TaskForm) -> Self {
        Self {
            title: form.title,
            start_time: form.start_time,
            end_time: form.end_time,
            category: form.category,
            color: form.color,
        }
    }
}

/// One calendar date and the tasks scheduled on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: String,
    /// Display label.
    pub name: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Day {
    /// An empty day whose id and name are both the date.
    pub fn empty(date: &str) -> Self {
        Self {
            id: date.to_string(),
            name: date.to_string(),
            date: date.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ── Snapshot helpers ────────────────────────────────────────────────────────

/// Find the day for `date` in a snapshot.
pub fn find_day<'a>(days: &'a [Day], date: &str) -> Option<&'a Day> {
    days.iter().find(|d| d.date == date)
}

/// Check the snapshot invariant: at most one day per date.
///
/// # Errors
///
/// Returns [`PlannerError::DuplicateDate`] naming the first repeated date.
pub fn validate_days(days: &[Day]) -> Result<()> {
    let mut seen = HashSet::with_capacity(days.len());
    for day in days {
        if !seen.insert(day.date.as_str()) {
            return Err(PlannerError::DuplicateDate(day.date.clone()));
        }
    }
    Ok(())
}

/// Append imported calendar tasks to a day, skipping ones it already holds.
///
/// A task counts as already present when an existing task shares its
/// `calendar_event_id` or its `id`. Imported tasks are re-dated onto the day.
pub fn merge_imported_tasks(day: &Day, imported: &[Task]) -> Day {
    let mut merged = day.clone();
    for task in imported {
        let known = merged.tasks.iter().any(|existing| {
            existing.id == task.id
                || (existing.calendar_event_id.is_some()
                    && existing.calendar_event_id == task.calendar_event_id)
        });
        if known {
            continue;
        }
        let mut task = task.clone();
        task.date = day.date.clone();
        merged.tasks.push(task);
    }
    merged
}

// ── Tests ───────────────────────────────────────────────────────────────────
