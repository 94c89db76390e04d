// tests/cli_args.rs

use std::io::Write;

use clap::Parser;
use tempfile::Builder;

use chefdag::cli::{CliArgs, LogLevel};
use chefdag::config::SchedulerSection;

#[test]
fn input_flag_is_required() {
    assert!(CliArgs::try_parse_from(["chefdag"]).is_err());
}

#[test]
fn short_input_flag_is_accepted() {
    let args = CliArgs::try_parse_from(["chefdag", "-i", "pasta.csv"]).unwrap();

    assert_eq!(args.input.to_str(), Some("pasta.csv"));
    assert!(!args.dry_run);
    assert_eq!(args.log_level, None);
}

#[test]
fn overrides_replace_file_settings() {
    let args = CliArgs::try_parse_from([
        "chefdag",
        "--input",
        "pasta.toml",
        "--poll-interval-ms",
        "5",
        "--deadline-secs",
        "60",
        "--log-level",
        "debug",
    ])
    .unwrap();

    let mut settings = SchedulerSection {
        time_unit_ms: 250,
        ..SchedulerSection::default()
    };
    args.apply_overrides(&mut settings);

    assert_eq!(settings.poll_interval_ms, 5);
    assert_eq!(settings.time_unit_ms, 250);
    assert_eq!(settings.deadline_secs, Some(60));
    assert_eq!(args.log_level, Some(LogLevel::Debug));
    assert_eq!(LogLevel::Debug.as_directive(), "debug");
}

#[tokio::test]
async fn dry_run_validates_without_running() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "1,,100,Boil water\n2,1,100,Cook pasta\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let args = CliArgs::try_parse_from(["chefdag", "-i", &path, "--dry-run"]).unwrap();

    // Durations are 100s each; a real run would not return this quickly.
    chefdag::run(args).await.unwrap();
}

#[tokio::test]
async fn dry_run_accepts_huge_chained_durations() {
    let huge = i64::MAX;
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "1,,{huge},a\n2,1,{huge},b\n3,2,{huge},c\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let args = CliArgs::try_parse_from(["chefdag", "-i", &path, "--dry-run"]).unwrap();

    chefdag::run(args).await.unwrap();
}

#[tokio::test]
async fn invalid_recipe_fails_before_scheduling() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "1,2,1,a\n2,1,1,b\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let args = CliArgs::try_parse_from(["chefdag", "-i", &path]).unwrap();

    let err = chefdag::run(args).await.unwrap_err();
    assert!(err.to_string().contains("Cyclic dependency"));
}
