use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use timewheel_engine::{
    apply_template_with_names, find_day, parse_iso_date, preview_template_application,
    validate_template, ApplyPolicy, Day, TargetRange, Template, TemplateApplyOptions,
};

use super::CliIds;
use crate::config::CliConfig;
use crate::io::{read_days, read_template, write_json};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Report what applying a template would change, without writing
    Preview(ApplyArgs),
    /// Apply a template and write the new snapshot
    Apply {
        #[command(flatten)]
        args: ApplyArgs,
        /// Write the new snapshot here instead of back to --days
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a template's tasks and print its summary
    Validate {
        #[command(flatten)]
        source: TemplateSource,
    },
    /// Capture one day of a snapshot as a day template
    FromDay {
        /// Snapshot file (JSON array of days)
        #[arg(long)]
        days: PathBuf,
        #[arg(long)]
        date: String,
        /// Template id
        #[arg(long)]
        id: String,
        /// Display name; defaults to the id
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct TemplateSource {
    /// JSON file holding a template or a list of templates
    #[arg(long)]
    template: PathBuf,
    /// Which template to use when the file holds several
    #[arg(long)]
    template_id: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Snapshot file (JSON array of days)
    #[arg(long)]
    days: PathBuf,
    #[command(flatten)]
    source: TemplateSource,
    /// Defaults to [defaults].policy from the config
    #[arg(long)]
    policy: Option<ApplyPolicy>,
    /// Explicit target date; repeat for several
    #[arg(long = "date", conflicts_with = "range")]
    dates: Vec<String>,
    /// Preset range of target dates around --anchor
    #[arg(long, value_enum)]
    range: Option<RangeArg>,
    /// Anchor date for --range; defaults to today
    #[arg(long, requires = "range")]
    anchor: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RangeArg {
    #[value(name = "selected-day")]
    SelectedDay,
    #[value(name = "next-7-days")]
    Next7Days,
    #[value(name = "current-week")]
    CurrentWeek,
    #[value(name = "next-4-weeks")]
    Next4Weeks,
    #[value(name = "current-month")]
    CurrentMonth,
}

impl From<RangeArg> for TargetRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::SelectedDay => TargetRange::SelectedDay,
            RangeArg::Next7Days => TargetRange::Next7Days,
            RangeArg::CurrentWeek => TargetRange::CurrentWeek,
            RangeArg::Next4Weeks => TargetRange::Next4Weeks,
            RangeArg::CurrentMonth => TargetRange::CurrentMonth,
        }
    }
}

impl ApplyArgs {
    fn options(&self, config: &CliConfig) -> Result<TemplateApplyOptions> {
        let policy = self.policy.unwrap_or(config.defaults.policy);
        let dates = match self.range {
            Some(range) => {
                let anchor: NaiveDate = match &self.anchor {
                    Some(anchor) => parse_iso_date(anchor)?,
                    None => Local::now().date_naive(),
                };
                TargetRange::from(range).dates(anchor)
            }
            None if self.dates.is_empty() => bail!("pass --date or --range to pick target dates"),
            None => self.dates.clone(),
        };
        Ok(TemplateApplyOptions::new(policy, &dates))
    }

    fn load(&self, config: &CliConfig) -> Result<(Vec<Day>, Template, TemplateApplyOptions)> {
        let days = read_days(&self.days)?;
        let template = self.source.load()?;
        let options = self.options(config)?;
        Ok((days, template, options))
    }
}

impl TemplateSource {
    fn load(&self) -> Result<Template> {
        read_template(&self.template, self.template_id.as_deref())
    }
}

/// Display name for a day created by a template, e.g. `Saturday`.
fn weekday_name(date: &str) -> String {
    parse_iso_date(date)
        .map(|d| d.format("%A").to_string())
        .unwrap_or_else(|_| date.to_string())
}

pub fn run(action: TemplateAction, config: &CliConfig, ids: &mut CliIds) -> Result<()> {
    match action {
        TemplateAction::Preview(args) => {
            let (days, template, options) = args.load(config)?;
            let preview = preview_template_application(&days, &template, &options);
            write_json(&preview, None)
        }
        TemplateAction::Apply { args, output } => {
            let (days, template, options) = args.load(config)?;
            let application =
                apply_template_with_names(&days, &template, &options, ids, weekday_name);
            let path = output.as_deref().unwrap_or(args.days.as_path());
            tracing::info!(
                template = %template.id,
                path = %path.display(),
                affected = application.preview.affected_dates.len(),
                "writing snapshot"
            );
            write_json(&application.days, Some(path))?;
            write_json(&application.preview, None)
        }
        TemplateAction::Validate { source } => {
            let template = source.load()?;
            validate_template(&template)
                .with_context(|| format!("template '{}' is invalid", template.id))?;
            write_json(&template.summary(), None)
        }
        TemplateAction::FromDay {
            days,
            date,
            id,
            name,
            output,
        } => {
            let snapshot = read_days(&days)?;
            let Some(day) = find_day(&snapshot, &date) else {
                bail!("no day for {date} in {}", days.display());
            };
            let name = name.as_deref().unwrap_or(&id);
            let template = Template::from_day(day, &id, name, Utc::now());
            write_json(&template, output.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name("2025-03-15"), "Saturday");
        assert_eq!(weekday_name("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_range_arg_maps_to_target_range() {
        assert_eq!(TargetRange::from(RangeArg::Next4Weeks), TargetRange::Next4Weeks);
        assert_eq!(TargetRange::from(RangeArg::SelectedDay), TargetRange::SelectedDay);
    }
}
