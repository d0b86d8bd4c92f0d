//! Reusable task sets and their resolution onto concrete dates.
//!
//! A [`Template`] is one of three shapes:
//!
//! - **day** — a single task list used for any date
//! - **week** — one task list per weekday, picked by the target date's weekday
//! - **month** — task lists stored under ISO dates, matched against a target
//!   by day-of-month only, so a month recorded in January replays in March
//!
//! On the wire a template is a flat JSON object tagged by `"type"`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_iso_date, WeekdayId};
use crate::error::{PlannerError, Result};
use crate::model::{Day, TemplateTask};
use crate::time::is_valid_time_range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: TemplateKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateKind {
    Day {
        tasks: Vec<TemplateTask>,
    },
    Week {
        days: BTreeMap<WeekdayId, Vec<TemplateTask>>,
    },
    Month {
        /// Keyed by ISO date; only the day-of-month component is used.
        days: BTreeMap<String, Vec<TemplateTask>>,
    },
}

impl TemplateKind {
    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Day { .. } => "day",
            TemplateKind::Week { .. } => "week",
            TemplateKind::Month { .. } => "month",
        }
    }
}

impl Template {
    fn with_kind(id: &str, name: &str, now: DateTime<Utc>, kind: TemplateKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            kind,
        }
    }

    pub fn new_day(id: &str, name: &str, now: DateTime<Utc>, tasks: Vec<TemplateTask>) -> Self {
        Self::with_kind(id, name, now, TemplateKind::Day { tasks })
    }

    pub fn new_week(
        id: &str,
        name: &str,
        now: DateTime<Utc>,
        days: BTreeMap<WeekdayId, Vec<TemplateTask>>,
    ) -> Self {
        Self::with_kind(id, name, now, TemplateKind::Week { days })
    }

    pub fn new_month(
        id: &str,
        name: &str,
        now: DateTime<Utc>,
        days: BTreeMap<String, Vec<TemplateTask>>,
    ) -> Self {
        Self::with_kind(id, name, now, TemplateKind::Month { days })
    }

    /// Capture the tasks of an existing day as a day template.
    pub fn from_day(day: &Day, id: &str, name: &str, now: DateTime<Utc>) -> Self {
        let tasks = day.tasks.iter().map(TemplateTask::from).collect();
        Self::new_day(id, name, now, tasks)
    }

    pub fn rename(&mut self, name: &str, now: DateTime<Utc>) {
        self.name = name.to_string();
        self.updated_at = now;
    }

    /// Template tasks for `date`, or an empty slice if none are defined.
    pub fn tasks_for_date(&self, date: &str) -> &[TemplateTask] {
        DateResolver::new(self).tasks_for(date)
    }

    pub fn summary(&self) -> TemplateSummary {
        let groups: Vec<&Vec<TemplateTask>> = match &self.kind {
            TemplateKind::Day { tasks } => vec![tasks],
            TemplateKind::Week { days } => days.values().collect(),
            TemplateKind::Month { days } => days.values().collect(),
        };
        TemplateSummary {
            kind: self.kind.label(),
            groups_with_tasks: groups.iter().filter(|tasks| !tasks.is_empty()).count(),
            total_tasks: groups.iter().map(|tasks| tasks.len()).sum(),
        }
    }
}

/// [`Template::tasks_for_date`] as a free function.
pub fn get_template_tasks_for_date<'a>(template: &'a Template, date: &str) -> &'a [TemplateTask] {
    template.tasks_for_date(date)
}

// ── Date resolution ─────────────────────────────────────────────────────────

/// Looks up template tasks by target date.
///
/// Month templates are indexed by day-of-month once up front. When two stored
/// dates share a day-of-month, the later date wins.
pub struct DateResolver<'a> {
    template: &'a Template,
    by_day_of_month: HashMap<u32, &'a [TemplateTask]>,
}

impl<'a> DateResolver<'a> {
    pub fn new(template: &'a Template) -> Self {
        let mut by_day_of_month = HashMap::new();
        if let TemplateKind::Month { days } = &template.kind {
            for (source_date, tasks) in days {
                match parse_iso_date(source_date) {
                    Ok(parsed) => {
                        by_day_of_month.insert(parsed.day(), tasks.as_slice());
                    }
                    Err(_) => {
                        tracing::warn!(template = %template.id, source_date = %source_date, "skipping malformed month key");
                    }
                }
            }
        }
        Self {
            template,
            by_day_of_month,
        }
    }

    pub fn tasks_for(&self, date: &str) -> &'a [TemplateTask] {
        let Ok(parsed) = parse_iso_date(date) else {
            return &[];
        };
        match &self.template.kind {
            TemplateKind::Day { tasks } => tasks.as_slice(),
            TemplateKind::Week { days } => days
                .get(&WeekdayId::of(parsed))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            TemplateKind::Month { .. } => self
                .by_day_of_month
                .get(&parsed.day())
                .copied()
                .unwrap_or(&[]),
        }
    }
}

// ── Validation and summary ──────────────────────────────────────────────────

/// Check a template before it is saved.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidTemplate`] for a blank name, a month key
/// that is not an ISO date, or a task with a blank title or unusable time
/// range. Task errors name the group and the 1-based task position.
pub fn validate_template(template: &Template) -> Result<()> {
    if template.name.trim().is_empty() {
        return Err(PlannerError::InvalidTemplate("template name is empty".to_string()));
    }

    let groups: Vec<(String, &Vec<TemplateTask>)> = match &template.kind {
        TemplateKind::Day { tasks } => vec![("day".to_string(), tasks)],
        TemplateKind::Week { days } => days
            .iter()
            .map(|(weekday, tasks)| (weekday.to_string(), tasks))
            .collect(),
        TemplateKind::Month { days } => {
            for key in days.keys() {
                if parse_iso_date(key).is_err() {
                    return Err(PlannerError::InvalidTemplate(format!(
                        "month key '{key}' is not an ISO date"
                    )));
                }
            }
            days.iter().map(|(date, tasks)| (date.clone(), tasks)).collect()
        }
    };

    for (label, tasks) in groups {
        for (index, task) in tasks.iter().enumerate() {
            if task.title.trim().is_empty() {
                return Err(PlannerError::InvalidTemplate(format!(
                    "empty title in {label}, task {}",
                    index + 1
                )));
            }
            if !is_valid_time_range(&task.start_time, &task.end_time) {
                return Err(PlannerError::InvalidTemplate(format!(
                    "invalid time in {label}, task {}",
                    index + 1
                )));
            }
        }
    }
    Ok(())
}

/// Counts for listing a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub kind: &'static str,
    /// Weekdays or dates (or the single day) that have at least one task.
    pub groups_with_tasks: usize,
    pub total_tasks: usize,
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn pattern(title: &str, start: &str, end: &str) -> TemplateTask {
        TemplateTask {
            title: title.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            category: "work".to_string(),
            color: "#2196F3".to_string(),
        }
    }

    fn week() -> Template {
        let mut days = BTreeMap::new();
        days.insert(WeekdayId::Monday, vec![pattern("Standup", "09:00", "09:15")]);
        days.insert(WeekdayId::Thursday, vec![]);
        Template::new_week("w1", "Work week", now(), days)
    }

    #[test]
    fn test_day_template_applies_to_any_date() {
        let t = Template::new_day("d1", "Routine", now(), vec![pattern("Walk", "07:00", "07:30")]);
        assert_eq!(t.tasks_for_date("2025-03-15").len(), 1);
        assert_eq!(t.tasks_for_date("2031-12-31").len(), 1);
    }

    #[test]
    fn test_week_template_picks_weekday() {
        let t = week();
        // 2025-03-17 is a Monday
        assert_eq!(t.tasks_for_date("2025-03-17")[0].title, "Standup");
        assert!(t.tasks_for_date("2025-03-18").is_empty());
        assert!(t.tasks_for_date("2025-03-20").is_empty());
    }

    #[test]
    fn test_month_template_matches_day_of_month() {
        let mut days = BTreeMap::new();
        days.insert("2025-01-15".to_string(), vec![pattern("Rent", "10:00", "10:30")]);
        let t = Template::new_month("m1", "Bills", now(), days);
        assert_eq!(get_template_tasks_for_date(&t, "2025-03-15")[0].title, "Rent");
        assert!(get_template_tasks_for_date(&t, "2025-03-16").is_empty());
    }

    #[test]
    fn test_month_template_out_of_range_day_is_empty() {
        let mut days = BTreeMap::new();
        days.insert("2025-01-31".to_string(), vec![pattern("Close books", "16:00", "17:00")]);
        let t = Template::new_month("m1", "Bills", now(), days);
        assert_eq!(t.tasks_for_date("2025-03-31").len(), 1);
        // April has no 31st, so nothing in April ever matches.
        assert!((1..=30)
            .map(|d| format!("2025-04-{d:02}"))
            .all(|d| t.tasks_for_date(&d).is_empty()));
    }

    #[test]
    fn test_month_template_later_date_wins_on_shared_day() {
        let mut days = BTreeMap::new();
        days.insert("2025-01-10".to_string(), vec![pattern("Old", "10:00", "11:00")]);
        days.insert("2025-02-10".to_string(), vec![pattern("New", "10:00", "11:00")]);
        let t = Template::new_month("m1", "Bills", now(), days);
        assert_eq!(t.tasks_for_date("2025-05-10")[0].title, "New");
    }

    #[test]
    fn test_malformed_target_date_resolves_to_nothing() {
        let t = Template::new_day("d1", "Routine", now(), vec![pattern("Walk", "07:00", "07:30")]);
        assert!(t.tasks_for_date("someday").is_empty());
    }

    #[test]
    fn test_template_json_is_flat_and_tagged() {
        let json = serde_json::to_value(week()).unwrap();
        assert_eq!(json["type"], "week");
        assert_eq!(json["days"]["monday"][0]["startTime"], "09:00");
        assert_eq!(json["createdAt"], "2025-01-01T12:00:00Z");
        let back: Template = serde_json::from_value(json).unwrap();
        assert_eq!(back, week());
    }

    #[test]
    fn test_template_deserializes_day_kind() {
        let json = r##"{"id":"d","name":"Morning","createdAt":"2025-01-01T00:00:00Z",
            "updatedAt":"2025-01-02T00:00:00Z","type":"day",
            "tasks":[{"title":"Tea","startTime":"07:00","endTime":"07:10","category":"food","color":"#fff"}]}"##;
        let t: Template = serde_json::from_str(json).unwrap();
        assert!(matches!(t.kind, TemplateKind::Day { ref tasks } if tasks.len() == 1));
    }

    #[test]
    fn test_from_day_strips_ids() {
        let mut day = Day::empty("2025-03-15");
        day.tasks.push(pattern("Walk", "07:00", "07:30").materialize("t-1".to_string(), "2025-03-15"));
        let t = Template::from_day(&day, "d1", "Saturday", now());
        assert_eq!(t.tasks_for_date("2025-04-01"), &[pattern("Walk", "07:00", "07:30")]);
    }

    #[test]
    fn test_rename_bumps_updated_at() {
        let mut t = week();
        let later = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        t.rename("Office week", later);
        assert_eq!(t.name, "Office week");
        assert_eq!(t.created_at, now());
        assert_eq!(t.updated_at, later);
    }

    #[test]
    fn test_validate_template_accepts_good_template() {
        assert!(validate_template(&week()).is_ok());
    }

    #[test]
    fn test_validate_template_blank_name() {
        let mut t = week();
        t.name = "  ".to_string();
        assert!(validate_template(&t).unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_validate_template_names_group_and_position() {
        let mut days = BTreeMap::new();
        days.insert(
            WeekdayId::Friday,
            vec![pattern("Demo", "14:00", "16:00"), pattern("Oops", "16:00", "16:00")],
        );
        let t = Template::new_week("w", "Week", now(), days);
        let msg = validate_template(&t).unwrap_err().to_string();
        assert!(msg.contains("invalid time in friday, task 2"), "got: {msg}");
    }

    #[test]
    fn test_validate_template_bad_month_key() {
        let mut days = BTreeMap::new();
        days.insert("15".to_string(), vec![pattern("Rent", "10:00", "10:30")]);
        let t = Template::new_month("m", "Bills", now(), days);
        assert!(validate_template(&t).unwrap_err().to_string().contains("'15'"));
    }

    #[test]
    fn test_summary_counts_groups_with_tasks() {
        let summary = week().summary();
        assert_eq!(summary.kind, "week");
        assert_eq!(summary.groups_with_tasks, 1);
        assert_eq!(summary.total_tasks, 1);
    }
}
