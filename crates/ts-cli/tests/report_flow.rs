//! End-to-end report flow: export JSON in, rendered table out.

use std::io::Write as _;
use std::path::PathBuf;

use ts_cli::commands::report;
use ts_cli::{ColorMode, Config, ReportArgs};

const EXPORT: &str = r#"[
  {"id": 1, "start": "20260114T090000Z", "end": "20260114T110000Z", "tags": ["guild", "frontend"]},
  {"id": 2, "start": "20260115T090000Z", "end": "20260115T120000Z", "tags": ["t123"]},
  {"id": 3, "start": "20260115T130000Z", "end": "20260115T133000Z", "tags": ["standup"]}
]"#;

fn write_export(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write export");
    file
}

fn args(input: PathBuf, color: ColorMode) -> ReportArgs {
    ReportArgs {
        start: Some("2026-01-12".to_string()),
        end: Some("2026-01-19".to_string()),
        input: Some(input),
        color,
        fetch_titles: false,
    }
}

fn run_report(export: &str, color: ColorMode) -> String {
    let file = write_export(export);
    let mut output = Vec::new();
    report::run(
        &mut output,
        &args(file.path().to_path_buf(), color),
        &Config::default(),
    )
    .expect("report succeeds");
    String::from_utf8(output).expect("utf-8 output")
}

#[test]
fn renders_both_days_with_totals() {
    let output = run_report(EXPORT, ColorMode::Never);

    // Day headers
    assert!(output.contains("W3"));
    assert!(output.contains("2026-01-14"));
    assert!(output.contains("Wed"));
    assert!(output.contains("2026-01-15"));
    assert!(output.contains("Thu"));

    // Categories with their groups, ids, and deep link
    assert!(output.contains("Guild"));
    assert!(output.contains("Frontend"));
    assert!(output.contains("@1"));
    assert!(output.contains("Standup"));
    assert!(output.contains("@3"));
    assert!(output.contains("T123"));
    assert!(output.contains("https://phabricator.collabora.org/T123"));

    // Day totals (2h, then 3h task + 30m standup) and the grand total
    assert!(output.contains("2:00:00"));
    assert!(output.contains("3:30:00"));
    assert!(output.contains("5:30:00"));
}

#[test]
fn fixed_categories_come_before_tasks_within_a_day() {
    let output = run_report(EXPORT, ColorMode::Never);

    let standup = output.find("Standup").expect("standup row");
    let task = output.find("T123").expect("task row");
    assert!(standup < task);
}

#[test]
fn never_mode_emits_no_escape_codes() {
    let output = run_report(EXPORT, ColorMode::Never);
    assert!(!output.contains('\u{1b}'));
}

#[test]
fn always_mode_highlights_identifiers() {
    let output = run_report(EXPORT, ColorMode::Always);
    // Default id color is cyan
    assert!(output.contains("\u{1b}[36m"));
}

#[test]
fn empty_export_produces_no_output() {
    let output = run_report("[]", ColorMode::Never);
    assert!(output.is_empty());
}

#[test]
fn malformed_export_is_a_load_error() {
    let file = write_export("{not json");
    let mut output = Vec::new();
    let result = report::run(
        &mut output,
        &args(file.path().to_path_buf(), ColorMode::Never),
        &Config::default(),
    );
    assert!(result.is_err());
}

#[test]
fn missing_input_file_is_a_load_error() {
    let mut output = Vec::new();
    let result = report::run(
        &mut output,
        &args(PathBuf::from("/nonexistent/export.json"), ColorMode::Never),
        &Config::default(),
    );
    assert!(result.is_err());
}

#[test]
fn fetch_titles_without_a_token_fails_up_front() {
    let file = write_export(EXPORT);
    let mut report_args = args(file.path().to_path_buf(), ColorMode::Never);
    report_args.fetch_titles = true;

    let mut output = Vec::new();
    let result = report::run(&mut output, &report_args, &Config::default());
    assert!(result.is_err());
}
