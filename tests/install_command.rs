#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for `--install`.

mod common;

use common::*;
use weecfg::commands::Outcome;
use weecfg::config::Value;
use weecfg::error::{ConfigError, EngineError, UsageError};

#[test]
fn install_without_prompting_writes_defaults() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
    ]);

    assert_eq!(
        run.result.as_ref().unwrap(),
        &Outcome::Installed {
            path: env.path("new.conf"),
            backup: None,
        }
    );
    assert_eq!(run.exit_code(), 0);

    let config = env.parse("new.conf");
    let station = config.root.section("Station").unwrap();
    assert_eq!(station.scalar("location"), Some("My Home Town"));
    assert_eq!(station.scalar("station_type"), Some("Simulator"));
    assert_eq!(station.value("altitude"), Some(&Value::from(vec!["0", "meter"])));
    assert_eq!(
        config.root.lookup(&["StdReport", "Defaults"]).unwrap().scalar("unit_system"),
        Some("us")
    );
    assert!(run.log.contains("Using distribution file"));
    assert!(run.log.contains("Saved configuration to"));
}

#[test]
fn install_keeps_template_comments() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
    ]);
    assert!(run.result.is_ok());

    let written = env.read("new.conf");
    assert!(written.starts_with("# WEEWX CONFIGURATION FILE\n"));
    assert!(written.contains("    # Description of the station location\n    location = My Home Town\n"));
}

#[test]
fn install_applies_command_line_values() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
        "--location",
        "Cambridge, MA",
        "--altitude=700,foot",
        "--latitude=42.37",
        "--longitude=-71.11",
        "--units=metric",
        "--driver=weewx.drivers.vantage",
        "--register-this-station=true",
    ]);
    assert!(run.result.is_ok(), "{:?}", run.result);

    let config = env.parse("new.conf");
    let station = config.root.section("Station").unwrap();
    assert_eq!(station.scalar("location"), Some("Cambridge, MA"));
    assert_eq!(station.value("altitude"), Some(&Value::from(vec!["700", "foot"])));
    assert_eq!(station.scalar("latitude"), Some("42.37"));
    assert_eq!(station.scalar("longitude"), Some("-71.11"));
    assert_eq!(station.scalar("station_type"), Some("Vantage"));

    let vantage = config.root.section("Vantage").unwrap();
    assert_eq!(vantage.scalar("driver"), Some("weewx.drivers.vantage"));
    assert_eq!(vantage.scalar("port"), Some("/dev/ttyUSB0"));

    assert_eq!(
        config
            .root
            .lookup(&["StdRESTful", "StationRegistry"])
            .unwrap()
            .scalar("register_this_station"),
        Some("true")
    );
    assert_eq!(
        config.root.lookup(&["StdReport", "Defaults"]).unwrap().scalar("unit_system"),
        Some("metric")
    );
}

#[test]
fn location_with_both_quote_kinds_survives_reconfigure() {
    let env = TestEnv::with_fixtures();
    let location = "Joe's \"Place\"";
    let run_install = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
        "--location",
        location,
    ]);
    assert!(run_install.result.is_ok(), "{:?}", run_install.result);
    assert_eq!(
        env.parse("new.conf").root.section("Station").unwrap().scalar("location"),
        Some(location)
    );

    let run_again = run(["--reconfigure", "--no-prompt", &env.arg("new.conf")]);
    assert!(run_again.result.is_ok(), "{:?}", run_again.result);
    assert_eq!(
        env.parse("new.conf").root.section("Station").unwrap().scalar("location"),
        Some(location)
    );
}

#[test]
fn install_over_existing_file_keeps_backup() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("weewx.conf"),
    ]);

    let Ok(Outcome::Installed { backup: Some(backup), .. }) = &run.result else {
        panic!("expected a backup, got {:?}", run.result);
    };
    assert_eq!(std::fs::read_to_string(backup).unwrap(), OLD_CONF);
    assert_eq!(env.backups_of("weewx.conf").len(), 1);
    assert!(run.log.contains("Saved backup to"));
}

#[test]
fn install_with_no_backup_replaces_file() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--no-prompt",
        "--no-backup",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("weewx.conf"),
    ]);
    assert!(run.result.is_ok());
    assert!(env.backups_of("weewx.conf").is_empty());
    assert!(env.read("weewx.conf").contains("version = 4.2.0"));
}

#[test]
fn install_without_output_is_a_usage_error() {
    let env = TestEnv::with_fixtures();
    let run = run(["--install", "--dist-config", &env.arg("dist.conf")]);
    assert!(matches!(
        run.result,
        Err(EngineError::Usage(UsageError::MissingOutput))
    ));
    assert_eq!(run.exit_code(), 2);
}

#[test]
fn install_with_existing_config_is_a_usage_error() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
        &env.arg("weewx.conf"),
    ]);
    assert!(matches!(
        run.result,
        Err(EngineError::Usage(UsageError::ConfigWithInstall))
    ));
    assert_eq!(run.exit_code(), 2);
    assert!(!env.path("new.conf").exists());
}

#[test]
fn install_with_missing_template_fails_without_writing() {
    let env = TestEnv::new();
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("missing.conf"),
        "--output",
        &env.arg("new.conf"),
    ]);
    assert!(matches!(
        run.result,
        Err(EngineError::Config(ConfigError::Io { .. }))
    ));
    assert_eq!(run.exit_code(), 1);
    assert!(env.files().is_empty());
}

#[test]
fn install_with_malformed_template_reports_line() {
    let env = TestEnv::new();
    env.write("dist.conf", "[Station]\n    location = Here\n  not a key value line\n");
    let run = run([
        "--install",
        "--no-prompt",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
    ]);
    let err = run.result.unwrap_err();
    assert!(matches!(err, EngineError::Config(ConfigError::Syntax { .. })));
    assert!(err.to_string().contains("line 3"), "{err}");
    assert!(!env.path("new.conf").exists());
}

#[test]
fn install_that_needs_prompting_without_terminal_writes_nothing() {
    let env = TestEnv::with_fixtures();
    let run = run([
        "--install",
        "--dist-config",
        &env.arg("dist.conf"),
        "--output",
        &env.arg("new.conf"),
    ]);
    assert!(matches!(run.result, Err(EngineError::Other(_))));
    assert_eq!(run.exit_code(), 1);
    assert!(!env.path("new.conf").exists());
}
