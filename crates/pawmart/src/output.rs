//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use pawmart_core::{Notice, NoticeLevel, Page, Record};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a notice the way it is shown on stderr.
pub fn format_notice(notice: &Notice, color: bool) -> String {
    match (notice.level, color) {
        (NoticeLevel::Success, true) => format!("{} {}", "✓".green(), notice.message),
        (NoticeLevel::Failure, true) => format!("{} {}", "✗".red(), notice.message.red()),
        (NoticeLevel::Success, false) => format!("✓ {}", notice.message),
        (NoticeLevel::Failure, false) => format!("✗ {}", notice.message),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render one page of a client-side query. Tables get a page footer.
pub fn render_page<R: Tabled>(
    format: &OutputFormat,
    page: &Page,
    to_row: impl Fn(&Record) -> R,
    id_fn: impl Fn(&Record) -> String,
) -> Result<String, CliError> {
    let body = render_list(format, &page.items, to_row, id_fn)?;
    match format {
        OutputFormat::Table if page.total_pages > 1 => Ok(format!(
            "{body}\npage {}/{} ({} total)",
            page.page, page.total_pages, page.total
        )),
        _ => Ok(body),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Key/value detail view of a record, one field per line.
pub fn record_detail(record: &Record) -> String {
    let width = record.as_map().keys().map(String::len).max().unwrap_or(0);
    record
        .as_map()
        .keys()
        .map(|key| {
            let value = record.text(key).unwrap_or_else(|| "-".into());
            format!("{key:<width$}  {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn pets() -> Vec<Record> {
        vec![
            Record::new().with("petId", 1).with("name", "Rex"),
            Record::new().with("petId", 2).with("name", "Tom"),
        ]
    }

    fn row(record: &Record) -> Row {
        Row {
            id: record.text("petId").unwrap_or_default(),
        }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &pets(), row, |r| {
            r.text("petId").unwrap_or_default()
        })
        .unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(&OutputFormat::JsonCompact, &pets(), row, |_| String::new()).unwrap();
        assert_eq!(out, r#"[{"name":"Rex","petId":1},{"name":"Tom","petId":2}]"#);
    }

    #[test]
    fn detail_aligns_keys() {
        let record = Record::new().with("petId", 1).with("name", "Rex");
        assert_eq!(record_detail(&record), "name   Rex\npetId  1");
    }

    #[test]
    fn notices_render_without_color() {
        let notice = Notice {
            level: NoticeLevel::Failure,
            message: "Pet not found".into(),
        };
        assert_eq!(format_notice(&notice, false), "✗ Pet not found");
    }
}
