//! # timewheel-engine
//!
//! Deterministic scheduling core for a personal day planner.
//!
//! The engine takes a snapshot of days, applies an edit or a template, and
//! hands back a new snapshot plus a summary. It never touches storage, a
//! clock, or the external calendar; the caller persists the result. Task ids
//! come from an injected [`IdGenerator`], so identical inputs give identical
//! output.
//!
//! ## Modules
//!
//! - [`time`] — `"HH:MM"` arithmetic and midnight-aware segments
//! - [`conflict`] — Overlap detection between clock ranges
//! - [`calendar`] — ISO dates, weekday ids, target-date ranges
//! - [`model`] — Day, Task, form and template-task records
//! - [`mutation`] — Add, update, and delete a task with conflict handling
//! - [`template`] — Day/week/month templates and per-date resolution
//! - [`apply`] — Template preview and application under a policy
//! - [`stats`] — Sorted views, load, current and next task
//! - [`ids`] — Task id generators
//! - [`error`] — Error types

pub mod apply;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod ids;
pub mod model;
pub mod mutation;
pub mod stats;
pub mod template;
pub mod time;

pub use apply::{
    apply_template, apply_template_with_names, preview_template_application, ApplyPolicy,
    TemplateApplication, TemplateApplyOptions, TemplateApplyPreview,
};
pub use calendar::{parse_iso_date, weekday_id, TargetRange, WeekdayId};
pub use conflict::{do_time_ranges_overlap, find_overlapping_pairs};
pub use error::{ErrorKind, PlannerError, Result};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use model::{find_day, merge_imported_tasks, validate_days, Day, Task, TaskForm, TemplateTask};
pub use mutation::{
    add_task, add_task_on, delete_task, delete_task_on, update_task, update_task_on, EditOptions,
    EngineConfig,
};
pub use stats::{current_task, day_stats, next_task, sorted_tasks, DayStats};
pub use template::{
    get_template_tasks_for_date, validate_template, Template, TemplateKind, TemplateSummary,
};
pub use time::{
    duration_minutes, get_time_segments, minutes_to_time, time_to_minutes, ClockRange,
};
