use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use serde::Serialize;
use timewheel_engine::{
    current_task, day_stats, find_day, find_overlapping_pairs, next_task, sorted_tasks,
    time_to_minutes, DayStats, Task,
};

use crate::io::{read_days, write_json};

#[derive(Subcommand)]
pub enum DayAction {
    /// Report overlapping task pairs across a snapshot; fails if any exist
    Check {
        #[arg(long)]
        days: PathBuf,
    },
    /// Load, ordering, and current/next task for one day
    Show {
        #[arg(long)]
        days: PathBuf,
        #[arg(long)]
        date: String,
        /// Clock time used for current/next, HH:MM
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayOverlaps<'a> {
    date: &'a str,
    pairs: Vec<(String, String)>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayReport<'a> {
    date: &'a str,
    name: &'a str,
    stats: DayStats,
    tasks: Vec<&'a Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<&'a Task>,
}

pub fn run(action: DayAction) -> Result<()> {
    match action {
        DayAction::Check { days } => {
            let snapshot = read_days(&days)?;
            let overlaps: Vec<DayOverlaps> = snapshot
                .iter()
                .map(|day| DayOverlaps {
                    date: &day.date,
                    pairs: find_overlapping_pairs(&day.tasks),
                })
                .filter(|o| !o.pairs.is_empty())
                .collect();
            write_json(&overlaps, None)?;
            let total: usize = overlaps.iter().map(|o| o.pairs.len()).sum();
            if total > 0 {
                bail!("{total} overlapping task pair(s) in {}", days.display());
            }
            Ok(())
        }
        DayAction::Show { days, date, at } => {
            let snapshot = read_days(&days)?;
            let Some(day) = find_day(&snapshot, &date) else {
                bail!("no day for {date} in {}", days.display());
            };
            let minute = at.as_deref().map(time_to_minutes).transpose()?;
            let report = DayReport {
                date: &day.date,
                name: &day.name,
                stats: day_stats(day),
                tasks: sorted_tasks(day),
                current: minute.and_then(|m| current_task(day, m)),
                next: minute.and_then(|m| next_task(day, m)),
            };
            write_json(&report, None)
        }
    }
}
