use std::fs;
use std::io::Cursor;

use chrono::{NaiveDate, Weekday};
use datenav_core::cli::{Command, TargetArgs};
use datenav_core::commands::{dispatch, run_session};
use datenav_core::host::NavigationHost;
use datenav_core::navigator::Control;
use datenav_core::render::Renderer;
use datenav_core::{Boundaries, Direction, FixedClock, NavContext, NavEvent, NavSettings, PeriodUnit};
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn write_config(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("datenav.toml");
    fs::write(&path, body).expect("write config");
    (temp, path)
}

#[test]
fn settings_file_drives_week_navigation() {
    let (_temp, path) = write_config(
        r#"
locale = "en_US"

[week]
start_on = "monday"

[navigation]
min_date = "2024-01-01"
max_date = "2024-01-21"
"#,
    );
    let settings = NavSettings::load(Some(&path)).expect("load settings");
    assert_eq!(settings.loaded_files, vec![path.clone()]);

    let week_start = settings.week_start;
    assert_eq!(week_start, Weekday::Mon);

    let ctx = NavContext::new(settings).with_clock(FixedClock(ymd(2024, 1, 1)));
    let mut host = NavigationHost::new(ctx, PeriodUnit::Week, week_start, ymd(2024, 1, 10));

    let view = host.view();
    assert_eq!(view.label, "08 - 14 Jan 2024");
    assert!(!view.previous.disabled);
    assert!(!view.next.disabled);

    assert!(host.handle(NavEvent::Click(Control::NextArrow)));
    assert_eq!(host.selected(), ymd(2024, 1, 15));

    let view = host.view();
    assert_eq!(view.label, "15 - 21 Jan 2024");
    assert!(view.next.disabled);
    assert!(!host.handle(NavEvent::Click(Control::NextArrow)));
    assert_eq!(host.selected(), ymd(2024, 1, 15));

    assert!(host.handle(NavEvent::Click(Control::PreviousArrow)));
    assert!(host.handle(NavEvent::Click(Control::PreviousArrow)));
    assert_eq!(host.selected(), ymd(2024, 1, 7));
    assert!(host.view().previous.disabled);
}

#[test]
fn inverted_boundaries_are_rejected_on_load() {
    let (_temp, path) = write_config(
        r#"
[navigation]
min_date = "2024-03-01"
max_date = "2024-02-01"
"#,
    );
    let err = NavSettings::load(Some(&path)).expect_err("inverted range");
    assert!(format!("{err:#}").contains("min_date"));
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("absent.toml");
    assert!(NavSettings::load(Some(&missing)).is_err());
}

#[test]
fn session_replays_interactions() {
    let ctx = NavContext::new(NavSettings::default()).with_clock(FixedClock(ymd(2024, 6, 1)));
    let mut host = NavigationHost::new(ctx, PeriodUnit::Month, Weekday::Sun, ymd(2024, 3, 31));

    let input = Cursor::new("prev\nopen\npick 2025-07-04\nopen\ndismiss\nbogus\nopen\npick\nquit\nnext\n");
    let mut out = Vec::new();
    run_session(&mut host, &Renderer::plain(), input, &mut out).expect("run session");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("March 2024"));
    assert!(text.contains("date: 2024-02-29"));
    assert!(text.contains("open to month (year, month)"));
    assert!(text.contains("date: 2025-07-04"));
    assert!(text.contains("error: unknown session command: bogus"));
    assert!(text.contains("date: 2024-06-01"));
    // Input after quit is not consumed.
    assert_eq!(host.selected(), ymd(2024, 6, 1));
    assert!(!host.popover().is_open());
}

#[test]
fn session_reports_disabled_arrows() {
    let settings = NavSettings {
        boundaries: datenav_core::Boundaries::new(Some(ymd(2024, 1, 9)), None),
        ..NavSettings::default()
    };
    let ctx = NavContext::new(settings).with_clock(FixedClock(ymd(2024, 1, 1)));
    let mut host = NavigationHost::new(ctx, PeriodUnit::Day, Weekday::Sun, ymd(2024, 1, 10));

    let mut out = Vec::new();
    run_session(&mut host, &Renderer::plain(), Cursor::new("prev\n"), &mut out)
        .expect("run session");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("unchanged: arrow is disabled"));
    assert_eq!(host.selected(), ymd(2024, 1, 10));
}

fn month_target(json: bool) -> TargetArgs {
    TargetArgs {
        unit: PeriodUnit::Month,
        date: None,
        week_start: None,
        json,
    }
}

fn run_command(command: Command) -> String {
    let settings = NavSettings {
        boundaries: Boundaries::new(None, Some(ymd(2024, 1, 31))),
        ..NavSettings::default()
    };
    let ctx = NavContext::new(settings).with_clock(FixedClock(ymd(2024, 1, 15)));
    let mut out = Vec::new();
    dispatch(ctx, &Renderer::plain(), command, Cursor::new(""), &mut out).expect("dispatch command");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn blocked_step_json_stays_parseable() {
    let text = run_command(Command::Step {
        target: month_target(true),
        direction: Direction::Next,
    });

    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["changed"], serde_json::json!(false));
    assert_eq!(value["selected"], serde_json::json!("2024-01-15"));
    assert_eq!(value["unit"], serde_json::json!("month"));
    assert_eq!(value["next"]["disabled"], serde_json::json!(true));
}

#[test]
fn allowed_step_json_reports_change() {
    let text = run_command(Command::Step {
        target: month_target(true),
        direction: Direction::Previous,
    });

    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["changed"], serde_json::json!(true));
    assert_eq!(value["selected"], serde_json::json!("2023-12-15"));
    assert_eq!(value["label"], serde_json::json!("December 2023"));
}

#[test]
fn blocked_step_text_explains_itself() {
    let text = run_command(Command::Step {
        target: month_target(false),
        direction: Direction::Next,
    });

    assert!(text.starts_with("unchanged: next arrow is disabled\n"));
    assert!(text.contains("Month: 2024-01-15"));
    assert!(text.contains("January 2024"));
}

#[test]
fn show_and_pick_write_to_the_given_output() {
    let shown = run_command(Command::Show(month_target(false)));
    assert!(shown.starts_with("Month: 2024-01-15\n"));

    let picked = run_command(Command::Pick {
        target: month_target(true),
        picked: Some(ymd(2023, 11, 3)),
    });
    let value: serde_json::Value = serde_json::from_str(&picked).expect("valid json");
    assert_eq!(value["selected"], serde_json::json!("2023-11-03"));
    assert_eq!(value["changed"], serde_json::json!(true));
    assert!(value["picker"].is_null());

    let today = run_command(Command::Pick {
        target: TargetArgs {
            date: Some(ymd(2024, 1, 2)),
            ..month_target(true)
        },
        picked: None,
    });
    let value: serde_json::Value = serde_json::from_str(&today).expect("valid json");
    assert_eq!(value["selected"], serde_json::json!("2024-01-15"));
}
