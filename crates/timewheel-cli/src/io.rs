//! JSON snapshot and template files.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use timewheel_engine::{validate_days, Day, Template};

/// Read a `Day[]` snapshot. A missing file is an empty snapshot.
pub fn read_days(path: &Path) -> Result<Vec<Day>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(Vec::new());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("reading days {}", path.display()))?;
    let days: Vec<Day> =
        serde_json::from_str(&text).with_context(|| format!("parsing days {}", path.display()))?;
    validate_days(&days).with_context(|| format!("checking days {}", path.display()))?;
    Ok(days)
}

/// Read one template from a file holding either a template or a list of them.
///
/// With a list, `id` picks the template; it may be omitted only when the list
/// has exactly one entry.
pub fn read_template(path: &Path, id: Option<&str>) -> Result<Template> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading template {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing template {}", path.display()))?;

    let mut templates: Vec<Template> = match value {
        Value::Array(_) => serde_json::from_value(value),
        other => serde_json::from_value(other).map(|t| vec![t]),
    }
    .with_context(|| format!("decoding template {}", path.display()))?;

    match id {
        Some(id) => match templates.iter().position(|t| t.id == id) {
            Some(index) => Ok(templates.swap_remove(index)),
            None => bail!("template '{id}' not found in {}", path.display()),
        },
        None if templates.len() == 1 => Ok(templates.remove(0)),
        None => bail!(
            "{} holds {} templates; pick one with --template-id",
            path.display(),
            templates.len()
        ),
    }
}

/// Pretty-print `value` to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("encoding JSON")?;
    match output {
        Some(path) => fs::write(path, text + "\n")
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("writing stdout")
        }
    }
}
