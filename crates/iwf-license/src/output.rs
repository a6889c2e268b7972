//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders a `ReconcileOutcome` in the format selected by `--output`.
//! Table uses `tabled`, structured formats use serde, plain emits
//! `key=value` lines for shell consumption.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use iwf_core::ReconcileOutcome;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render a reconciliation outcome in the chosen format.
pub fn render_outcome(
    format: &OutputFormat,
    outcome: &ReconcileOutcome,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(outcome, color)),
        OutputFormat::Json => render_json(outcome, false),
        OutputFormat::JsonCompact => render_json(outcome, true),
        OutputFormat::Yaml => render_yaml(outcome),
        OutputFormat::Plain => Ok(outcome
            .fields()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render any serializable value (used by `config show`).
pub fn render_value<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Table | OutputFormat::Plain => {
            toml::to_string_pretty(data).map_err(|e| CliError::Render(e.to_string()))
        }
    }
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

fn render_table(outcome: &ReconcileOutcome, color: bool) -> String {
    let rows: Vec<FieldRow> = outcome
        .fields()
        .into_iter()
        .map(|(field, value)| {
            let value = match (field, color) {
                ("changed", true) if outcome.changed => value.yellow().bold().to_string(),
                ("changed", true) => value.green().to_string(),
                _ => value,
            };
            FieldRow { field, value }
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwf_core::{DeviceReference, Presence};

    fn outcome() -> ReconcileOutcome {
        let device = DeviceReference::new(
            "https://localhost/mgmt/shared/resolver/device-groups/cm-cloud-managed-devices/devices/d-1",
        );
        ReconcileOutcome {
            changed: true,
            pool: "prod-pool".into(),
            state: Presence::Present,
            check_mode: false,
            devices: vec![device.clone()],
            added: vec![device],
            removed: Vec::new(),
        }
    }

    #[test]
    fn plain_output_is_key_value_lines() {
        let out = render_outcome(&OutputFormat::Plain, &outcome(), false).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "changed=true");
        assert_eq!(lines[1], "pool=prod-pool");
        assert!(lines.iter().any(|l| l.starts_with("added=https://localhost/")));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_outcome(&OutputFormat::JsonCompact, &outcome(), false).unwrap();
        assert!(!out.contains('\n'));
        assert!(out.contains(r#""changed":true"#));
        assert!(!out.contains("removed"));
    }

    #[test]
    fn table_without_color_has_no_escape_codes() {
        let out = render_outcome(&OutputFormat::Table, &outcome(), false).unwrap();
        assert!(out.contains("prod-pool"));
        assert!(!out.contains('\u{1b}'));
    }
}
