use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use timewheel_engine::{
    add_task_on, delete_task_on, find_day, merge_imported_tasks, update_task_on, Day,
    EditOptions, Task, TaskForm,
};

use super::CliIds;
use crate::config::CliConfig;
use crate::io::{read_days, write_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task, creating the day if needed
    Add {
        #[command(flatten)]
        target: DayTarget,
        #[command(flatten)]
        form: FormArgs,
        /// Trim or drop overlapping tasks instead of failing
        #[arg(long)]
        allow_overlap: bool,
    },
    /// Rewrite an existing task
    Update {
        #[command(flatten)]
        target: DayTarget,
        /// Id of the task to rewrite
        #[arg(long)]
        id: String,
        #[command(flatten)]
        form: FormArgs,
        /// Accept overlaps instead of failing
        #[arg(long)]
        allow_overlap: bool,
    },
    /// Remove a task; unknown ids are ignored
    Delete {
        #[command(flatten)]
        target: DayTarget,
        #[arg(long)]
        id: String,
    },
    /// Merge calendar tasks from a JSON file, skipping ones already present
    Import {
        #[command(flatten)]
        target: DayTarget,
        /// JSON array of tasks
        #[arg(long)]
        events: PathBuf,
    },
}

#[derive(Args)]
pub struct DayTarget {
    /// Snapshot file (JSON array of days)
    #[arg(long)]
    days: PathBuf,
    /// ISO date of the day to edit
    #[arg(long)]
    date: String,
    /// Write the new snapshot here instead of back to --days
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DayTarget {
    fn save(&self, days: &[Day]) -> Result<()> {
        let path = self.output.as_deref().unwrap_or(self.days.as_path());
        write_json(&days, Some(path))
    }
}

#[derive(Args)]
pub struct FormArgs {
    #[arg(long)]
    title: String,
    /// Start time, HH:MM
    #[arg(long)]
    start: String,
    /// End time, HH:MM; earlier than start means the task runs past midnight
    #[arg(long)]
    end: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    color: Option<String>,
}

impl FormArgs {
    fn into_form(self, config: &CliConfig) -> TaskForm {
        let category = self.category.unwrap_or_else(|| config.defaults.category.clone());
        let color = self.color.unwrap_or_else(|| config.defaults.color.clone());
        TaskForm::new(&self.title, &self.start, &self.end)
            .with_category(&category)
            .with_color(&color)
    }
}

fn edit_options(allow_overlap: bool) -> EditOptions {
    if allow_overlap {
        EditOptions::allow_overlap()
    } else {
        EditOptions::default()
    }
}

pub fn run(action: TaskAction, config: &CliConfig, ids: &mut CliIds) -> Result<()> {
    match action {
        TaskAction::Add {
            target,
            form,
            allow_overlap,
        } => {
            let days = read_days(&target.days)?;
            let form = form.into_form(config);
            let next = add_task_on(&days, &target.date, form, edit_options(allow_overlap), ids)?;
            tracing::info!(date = %target.date, "task added");
            target.save(&next)
        }
        TaskAction::Update {
            target,
            id,
            form,
            allow_overlap,
        } => {
            let days = read_days(&target.days)?;
            let form = form.into_form(config);
            let next = update_task_on(
                &days,
                &target.date,
                &id,
                form,
                edit_options(allow_overlap),
                &config.engine,
            )?;
            tracing::info!(date = %target.date, %id, "task updated");
            target.save(&next)
        }
        TaskAction::Delete { target, id } => {
            let days = read_days(&target.days)?;
            let next = delete_task_on(&days, &target.date, &id);
            target.save(&next)
        }
        TaskAction::Import { target, events } => {
            let days = read_days(&target.days)?;
            let text = std::fs::read_to_string(&events)
                .with_context(|| format!("reading events {}", events.display()))?;
            let imported: Vec<Task> = serde_json::from_str(&text)
                .with_context(|| format!("parsing events {}", events.display()))?;

            timewheel_engine::parse_iso_date(&target.date)?;
            let mut next = days.clone();
            match next.iter().position(|d| d.date == target.date) {
                Some(index) => next[index] = merge_imported_tasks(&next[index], &imported),
                None => next.push(merge_imported_tasks(&Day::empty(&target.date), &imported)),
            }
            let before = find_day(&days, &target.date).map_or(0, |d| d.tasks.len());
            let after = find_day(&next, &target.date).map_or(0, |d| d.tasks.len());
            tracing::info!(date = %target.date, merged = after - before, "calendar tasks imported");
            target.save(&next)
        }
    }
}
