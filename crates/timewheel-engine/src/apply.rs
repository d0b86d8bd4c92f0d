//! Template application: dry-run previews and materialized results.
//!
//! [`preview_template_application`] and [`apply_template`] share one
//! per-date planner, so an apply always reports exactly the counters a
//! preview of the same inputs would. Per-task conflicts under
//! [`ApplyPolicy::MergeSkipConflicts`] are counted, never raised; a bulk
//! apply does not stop halfway.
//!
//! Target dates are de-duplicated and sorted before use, and malformed ones
//! are dropped. Template tasks are considered in stored order, so under
//! merge the earlier of two clashing template tasks wins.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::normalize_target_dates;
use crate::conflict::ranges_overlap;
use crate::error::PlannerError;
use crate::ids::IdGenerator;
use crate::model::{Day, Task, TemplateTask};
use crate::template::{DateResolver, Template};
use crate::time::ClockRange;

/// How template tasks interact with a target day's existing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPolicy {
    /// Fill only days that have no tasks yet.
    #[default]
    EmptyOnly,
    /// Discard the day's tasks and use the template's.
    Replace,
    /// Keep existing tasks and add every template task that fits around them.
    MergeSkipConflicts,
}

impl ApplyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyPolicy::EmptyOnly => "empty_only",
            ApplyPolicy::Replace => "replace",
            ApplyPolicy::MergeSkipConflicts => "merge_skip_conflicts",
        }
    }
}

impl fmt::Display for ApplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyPolicy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty_only" => Ok(ApplyPolicy::EmptyOnly),
            "replace" => Ok(ApplyPolicy::Replace),
            "merge_skip_conflicts" => Ok(ApplyPolicy::MergeSkipConflicts),
            other => Err(PlannerError::InvalidTemplate(format!(
                "unknown apply policy '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateApplyOptions {
    pub policy: ApplyPolicy,
    pub target_dates: Vec<String>,
}

impl TemplateApplyOptions {
    pub fn new<S: AsRef<str>>(policy: ApplyPolicy, target_dates: &[S]) -> Self {
        Self {
            policy,
            target_dates: target_dates.iter().map(|d| d.as_ref().to_string()).collect(),
        }
    }
}

/// Summary of what applying a template does (or did) to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateApplyPreview {
    pub template_id: String,
    pub policy: ApplyPolicy,
    /// Distinct, well-formed target dates considered.
    pub target_dates_count: usize,
    /// Dates whose day changes, ascending.
    pub affected_dates: Vec<String>,
    pub added_tasks: usize,
    /// Affected dates that had tasks before a `replace`.
    pub replaced_days: usize,
    /// Template tasks left out by `merge_skip_conflicts`.
    pub skipped_conflicts: usize,
    pub untouched_days: usize,
}

impl TemplateApplyPreview {
    fn empty(template: &Template, policy: ApplyPolicy, target_dates_count: usize) -> Self {
        Self {
            template_id: template.id.clone(),
            policy,
            target_dates_count,
            affected_dates: Vec::new(),
            added_tasks: 0,
            replaced_days: 0,
            skipped_conflicts: 0,
            untouched_days: 0,
        }
    }

    fn record(&mut self, date: &str, plan: &DatePlan<'_>) {
        self.skipped_conflicts += plan.skipped;
        match plan.write {
            DayWrite::Untouched => self.untouched_days += 1,
            DayWrite::Overwrite | DayWrite::Append => {
                self.affected_dates.push(date.to_string());
                self.added_tasks += plan.accepted.len();
                if plan.replaced {
                    self.replaced_days += 1;
                }
            }
        }
    }
}

/// The new snapshot together with the summary that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateApplication {
    pub days: Vec<Day>,
    pub preview: TemplateApplyPreview,
}

// ── Public entry points ─────────────────────────────────────────────────────

/// Report what [`apply_template`] would do, without building any tasks.
pub fn preview_template_application(
    days: &[Day],
    template: &Template,
    options: &TemplateApplyOptions,
) -> TemplateApplyPreview {
    let targets = normalize_target_dates(&options.target_dates);
    let index = index_days(days);
    let resolver = DateResolver::new(template);
    let mut preview = TemplateApplyPreview::empty(template, options.policy, targets.len());

    for date in &targets {
        let existing = existing_tasks(&index, date);
        let plan = plan_date(options.policy, existing, resolver.tasks_for(date));
        preview.record(date, &plan);
    }
    preview
}

/// Apply `template` to the snapshot, naming newly created days by their date.
///
/// See [`apply_template_with_names`].
pub fn apply_template(
    days: &[Day],
    template: &Template,
    options: &TemplateApplyOptions,
    ids: &mut impl IdGenerator,
) -> TemplateApplication {
    apply_template_with_names(days, template, options, ids, |date| date.to_string())
}

/// Apply `template` to the snapshot.
///
/// Accepted template tasks are materialized with ids from `ids`, in target
/// date order then template order. Under `empty_only` and `replace` an
/// affected day's task list becomes exactly the materialized tasks; under
/// `merge_skip_conflicts` they are appended. A target date with no day yet
/// gets a new one whose id is the date and whose name comes from
/// `name_for_date`. Days that are not affected pass through unchanged. The
/// returned snapshot is sorted by date.
pub fn apply_template_with_names<F>(
    days: &[Day],
    template: &Template,
    options: &TemplateApplyOptions,
    ids: &mut impl IdGenerator,
    name_for_date: F,
) -> TemplateApplication
where
    F: Fn(&str) -> String,
{
    let targets = normalize_target_dates(&options.target_dates);
    let index = index_days(days);
    let resolver = DateResolver::new(template);
    let mut preview = TemplateApplyPreview::empty(template, options.policy, targets.len());
    let mut rewritten: Vec<Day> = Vec::new();

    for date in &targets {
        let current = index.get(date.as_str()).copied();
        let existing = current.map(|d| d.tasks.as_slice()).unwrap_or(&[]);
        let plan = plan_date(options.policy, existing, resolver.tasks_for(date));
        preview.record(date, &plan);

        let mut tasks: Vec<Task> = match plan.write {
            DayWrite::Untouched => continue,
            DayWrite::Overwrite => Vec::with_capacity(plan.accepted.len()),
            DayWrite::Append => existing.to_vec(),
        };
        tasks.extend(
            plan.accepted
                .iter()
                .map(|pattern| pattern.materialize(ids.next_id(), date)),
        );

        rewritten.push(match current {
            Some(day) => Day {
                tasks,
                ..day.clone()
            },
            None => Day {
                id: date.clone(),
                name: name_for_date(date),
                date: date.clone(),
                tasks,
            },
        });
    }

    let affected: BTreeSet<&str> = preview.affected_dates.iter().map(String::as_str).collect();
    let mut next: Vec<Day> = days
        .iter()
        .filter(|d| !affected.contains(d.date.as_str()))
        .cloned()
        .chain(rewritten)
        .collect();
    next.sort_by(|a, b| a.date.cmp(&b.date));

    tracing::debug!(
        template = %template.id,
        policy = %options.policy,
        affected = preview.affected_dates.len(),
        added = preview.added_tasks,
        skipped = preview.skipped_conflicts,
        "template applied"
    );

    TemplateApplication {
        days: next,
        preview,
    }
}

// ── Per-date planning ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayWrite {
    Untouched,
    /// Task list becomes exactly the accepted template tasks.
    Overwrite,
    /// Accepted template tasks go after the existing ones.
    Append,
}

#[derive(Debug)]
struct DatePlan<'a> {
    write: DayWrite,
    accepted: Vec<&'a TemplateTask>,
    skipped: usize,
    replaced: bool,
}

impl DatePlan<'_> {
    fn untouched(skipped: usize) -> Self {
        Self {
            write: DayWrite::Untouched,
            accepted: Vec::new(),
            skipped,
            replaced: false,
        }
    }
}

fn plan_date<'a>(policy: ApplyPolicy, existing: &[Task], source: &'a [TemplateTask]) -> DatePlan<'a> {
    if source.is_empty() {
        return DatePlan::untouched(0);
    }

    match policy {
        ApplyPolicy::EmptyOnly if !existing.is_empty() => DatePlan::untouched(0),
        ApplyPolicy::EmptyOnly => DatePlan {
            write: DayWrite::Overwrite,
            accepted: source.iter().collect(),
            skipped: 0,
            replaced: false,
        },
        ApplyPolicy::Replace => DatePlan {
            write: DayWrite::Overwrite,
            accepted: source.iter().collect(),
            skipped: 0,
            replaced: !existing.is_empty(),
        },
        ApplyPolicy::MergeSkipConflicts => {
            let mut occupied: Vec<ClockRange> = existing.iter().filter_map(Task::range).collect();
            let mut accepted = Vec::new();
            let mut skipped = 0;

            for pattern in source {
                match pattern.range() {
                    Some(range) if occupied.iter().any(|o| ranges_overlap(&range, o)) => {
                        tracing::trace!(title = %pattern.title, "template task skipped on conflict");
                        skipped += 1;
                    }
                    Some(range) => {
                        occupied.push(range);
                        accepted.push(pattern);
                    }
                    // No usable range means nothing to collide with.
                    None => accepted.push(pattern),
                }
            }

            if accepted.is_empty() {
                DatePlan::untouched(skipped)
            } else {
                DatePlan {
                    write: DayWrite::Append,
                    accepted,
                    skipped,
                    replaced: false,
                }
            }
        }
    }
}

fn index_days(days: &[Day]) -> HashMap<&str, &Day> {
    days.iter().map(|d| (d.date.as_str(), d)).collect()
}

fn existing_tasks<'a>(index: &HashMap<&str, &'a Day>, date: &str) -> &'a [Task] {
    index.get(date).map(|d| d.tasks.as_slice()).unwrap_or(&[])
}

// ── Tests ───────────────────────────────────────────────────────────────────
