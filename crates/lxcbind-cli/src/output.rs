//! Formatted output helpers for CLI commands.
//!
//! Every command prints either a fixed-width table or JSON, selected by the
//! global `--json` flag.

use lxcbind_common::types::ContainerSummary;
use serde::Serialize;

/// Renders a container summary as aligned `FIELD  value` rows.
#[must_use]
pub fn summary_table(summary: &ContainerSummary) -> String {
    let rows = [
        ("NAME", summary.name.clone()),
        ("STATE", summary.state.to_string()),
        ("DEFINED", yes_no(summary.defined).to_string()),
        ("RUNNING", yes_no(summary.running).to_string()),
        (
            "PID",
            summary
                .init_pid
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
        ),
        (
            "CONFIG",
            summary
                .config_file
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
        ),
    ];
    rows.iter()
        .map(|(field, value)| format!("{field:<10} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Prints `value` as JSON when `json` is set, otherwise through `human`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit<T, F>(json: bool, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", to_json(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

/// Joins config values or keys one per line.
#[must_use]
pub fn lines(values: &[String]) -> String {
    values.join("\n")
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lxcbind_common::types::LifecycleState;

    use super::*;

    fn summary() -> ContainerSummary {
        ContainerSummary {
            name: "web".into(),
            state: LifecycleState::Running,
            defined: true,
            running: true,
            init_pid: Some(4000),
            config_file: Some(PathBuf::from("/var/lib/lxc/web/config")),
        }
    }

    #[test]
    fn table_lists_every_field() {
        let table = summary_table(&summary());
        assert!(table.contains("NAME       web"));
        assert!(table.contains("STATE      RUNNING"));
        assert!(table.contains("PID        4000"));
        assert!(table.contains("CONFIG     /var/lib/lxc/web/config"));
    }

    #[test]
    fn table_shows_dash_for_missing_pid() {
        let mut s = summary();
        s.init_pid = None;
        s.running = false;
        let table = summary_table(&s);
        assert!(table.contains("PID        -"));
        assert!(table.contains("RUNNING    no"));
    }

    #[test]
    fn json_uses_uppercase_state() {
        let json = to_json(&summary()).unwrap();
        assert!(json.contains("\"RUNNING\""));
    }

    #[test]
    fn lines_keeps_empty_entry() {
        assert_eq!(lines(&[String::new()]), "");
        assert_eq!(lines(&["a".into(), "b".into()]), "a\nb");
    }
}
