// Shared helpers for integration tests.
//
// Each test gets a temporary directory holding a distribution template and
// an older user configuration, and runs the engine in-process with a
// recording logger and a prompter that refuses to prompt.
#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::bail;
use clap::Parser;
use weecfg::cli::Cli;
use weecfg::commands::{ConfigEngine, Outcome};
use weecfg::config::ConfigObj;
use weecfg::drivers::DriverCatalog;
use weecfg::error::EngineError;
use weecfg::logging::Log;
use weecfg::options::Options;
use weecfg::station::{Prompter, StationInfo};

/// A distribution template, as shipped with a new release.
pub const DIST_CONF: &str = "\
# WEEWX CONFIGURATION FILE

debug = 0

version = 4.2.0

##############################################################################

[Station]
    # Description of the station location
    location = My Home Town

    # Latitude in decimal degrees. Negative for southern hemisphere
    latitude = 0.00
    # Longitude in decimal degrees. Negative for western hemisphere.
    longitude = 0.00

    # Altitude of the station, with unit it is in.
    altitude = 0, meter

    # Set to type of station hardware.
    station_type = Simulator

##############################################################################

[Simulator]
    loop_interval = 2.5
    mode = simulator
    driver = weewx.drivers.simulator

##############################################################################

[StdRESTful]
    [[StationRegistry]]
        register_this_station = false

##############################################################################

[StdReport]
    SKIN_ROOT = skins
    HTML_ROOT = public_html

    [[SeasonsReport]]
        skin = Seasons
        enable = true

    [[SmartphoneReport]]
        skin = Smartphone
        enable = false

    [[MobileReport]]
        skin = Mobile
        enable = false

    [[Defaults]]
        unit_system = us
";

/// A configuration written by an older release and edited by its owner.
pub const OLD_CONF: &str = "\
debug = 1

version = 3.9.1

[Station]
    location = \"Boston, MA\"
    latitude = 42.36
    longitude = -71.06
    altitude = 20, foot
    station_type = Vantage
    rain_year_start = 7

[Vantage]
    type = serial
    port = /dev/ttyS0
    driver = weewx.drivers.vantage

[StdReport]
    SKIN_ROOT = skins

    [[SeasonsReport]]
        skin = Seasons
        enable = false

    [[MyCustomReport]]
        skin = Custom

# local additions end here
";

/// [`Log`] that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, msg.to_string()));
    }

    /// All messages logged at `level`.
    pub fn at(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any message at any level contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .any(|(_, m)| m.contains(needle))
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}

/// [`Prompter`] standing in for a session without a terminal.
#[derive(Debug)]
pub struct RefusingPrompter;

impl Prompter for RefusingPrompter {
    fn prompt_for_info(&self, _current: &StationInfo) -> anyhow::Result<StationInfo> {
        bail!("standard input is not a terminal")
    }

    fn prompt_for_driver(&self, _current: &str) -> anyhow::Result<String> {
        bail!("standard input is not a terminal")
    }

    fn prompt_for_driver_settings(
        &self,
        _driver: &str,
        _config: &ConfigObj,
    ) -> anyhow::Result<Vec<(String, String)>> {
        bail!("standard input is not a terminal")
    }
}

/// What one engine run produced.
#[derive(Debug)]
pub struct RunResult {
    pub result: Result<Outcome, EngineError>,
    pub stdout: String,
    pub log: RecordingLog,
}

impl RunResult {
    /// Process exit status the binary would report.
    pub fn exit_code(&self) -> u8 {
        self.result.as_ref().map_or_else(EngineError::exit_code, |_| 0)
    }
}

/// Temporary directory holding the files for one test.
pub struct TestEnv {
    pub dir: tempfile::TempDir,
}

impl TestEnv {
    /// Empty directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Directory with `dist.conf` and `weewx.conf` (the old file).
    pub fn with_fixtures() -> Self {
        let env = Self::new();
        env.write("dist.conf", DIST_CONF);
        env.write("weewx.conf", OLD_CONF);
        env
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Path as a command-line argument.
    pub fn arg(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).expect("write fixture");
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read file")
    }

    pub fn parse(&self, name: &str) -> ConfigObj {
        ConfigObj::parse(&self.read(name)).expect("written file should parse")
    }

    /// Names of every entry in the directory, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("read temp dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Backups of `name` made by a save.
    pub fn backups_of(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name}.");
        self.files()
            .into_iter()
            .filter(|f| f.starts_with(&prefix))
            .collect()
    }

    /// Canonical form of a path in this directory.
    pub fn canonical(&self, name: &str) -> PathBuf {
        dunce::canonicalize(self.path(name)).expect("canonicalize")
    }
}

/// Run `wee_config` with `args` in-process.
pub fn run<I, S>(args: I) -> RunResult
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let argv = std::iter::once(OsString::from("wee_config")).chain(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    let log = RecordingLog::default();
    let catalog = DriverCatalog::builtin().expect("built-in catalog");
    let prompter = RefusingPrompter;
    let mut stdout = Vec::new();

    let result = Options::from_cli(&cli)
        .map_err(EngineError::from)
        .and_then(|options| ConfigEngine::new(&log, &prompter, &catalog).run(&options, &mut stdout));

    RunResult {
        result,
        stdout: String::from_utf8(stdout).expect("stdout is UTF-8"),
        log,
    }
}

/// Assert that `path` exists and is a regular file.
pub fn assert_file(path: &Path) {
    assert!(path.is_file(), "expected file at {}", path.display());
}
