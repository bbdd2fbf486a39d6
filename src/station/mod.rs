//! Station information: what is read from a configuration file, how it is
//! combined with command-line values, defaults and answers to prompts, and
//! how the result is written back.
pub mod modify;
pub mod prompt;

use std::collections::BTreeMap;

use anyhow::Result;

use crate::config::{ConfigObj, Value};
use crate::options::StationOverrides;

pub use modify::modify_config;
pub use prompt::{InquirePrompter, Prompter};

/// Keys every resolved [`StationInfo`] carries, in prompt order.
pub const STATION_KEYS: [&str; 8] = [
    "location",
    "latitude",
    "longitude",
    "altitude",
    "units",
    "register_this_station",
    "station_type",
    "driver",
];

/// Driver used when neither the file nor the command line names one.
pub const DEFAULT_DRIVER: &str = "weewx.drivers.simulator";

/// Unit systems a report can be rendered in.
pub const UNIT_SYSTEMS: [&str; 3] = ["us", "metricwx", "metric"];

/// Units accepted for the station altitude.
pub const ALTITUDE_UNITS: [&str; 2] = ["foot", "meter"];

/// Built-in value for a station key.
#[must_use]
pub fn default_value(key: &str) -> Option<Value> {
    let value = match key {
        "location" => Value::from("My Home Town"),
        "latitude" | "longitude" => Value::from("0.0"),
        "altitude" => Value::from(vec!["0", "meter"]),
        "units" => Value::from("metricwx"),
        "register_this_station" => Value::from("false"),
        "station_type" => Value::from("Simulator"),
        "driver" => Value::from(DEFAULT_DRIVER),
        _ => return None,
    };
    Some(value)
}

/// Parse `VALUE,UNIT` into `[value, unit]`.
///
/// The value must be a number and the unit one of [`ALTITUDE_UNITS`].
///
/// ```
/// use weecfg::station::parse_altitude;
///
/// assert_eq!(parse_altitude("700, foot"), Some(vec!["700".into(), "foot".into()]));
/// assert_eq!(parse_altitude("700"), None);
/// ```
#[must_use]
pub fn parse_altitude(text: &str) -> Option<Vec<String>> {
    let (value, unit) = text.split_once(',')?;
    let (value, unit) = (value.trim(), unit.trim());
    if value.parse::<f64>().is_err() || !ALTITUDE_UNITS.contains(&unit) {
        return None;
    }
    Some(vec![value.to_string(), unit.to_string()])
}

/// Station attributes keyed by name.
///
/// Besides [`STATION_KEYS`], any other key is a driver-specific setting
/// destined for the driver's own section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationInfo {
    values: BTreeMap<String, Value>,
}

impl StationInfo {
    /// An empty set of attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value of `key` as a single string, joining lists.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.values.get(key).map(Value::to_joined)
    }

    /// Whether `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Copy every entry of `other` over this one.
    pub fn update(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// All entries, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that are not among [`STATION_KEYS`].
    pub fn driver_settings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| !STATION_KEYS.contains(k))
    }
}

/// Read the station attributes present in `config`.
///
/// Only keys that exist are returned. `location` is joined into one string
/// even if the file split it at a comma; the driver comes from the section
/// named by `station_type`.
#[must_use]
pub fn get_station_info(config: &ConfigObj) -> StationInfo {
    let mut info = StationInfo::new();

    if let Some(station) = config.root.section("Station") {
        for key in ["location", "latitude", "longitude"] {
            if let Some(value) = station.value(key) {
                info.set(key, value.to_joined());
            }
        }
        if let Some(altitude) = station.value("altitude") {
            info.set("altitude", altitude.clone());
        }
        if let Some(station_type) = station.value("station_type").map(Value::to_joined) {
            if let Some(driver) = config
                .root
                .section(&station_type)
                .and_then(|s| s.value("driver"))
            {
                info.set("driver", driver.to_joined());
            }
            info.set("station_type", station_type);
        }
    }

    if let Some(register) = config
        .root
        .lookup(&["StdRESTful", "StationRegistry"])
        .and_then(|s| s.value("register_this_station"))
    {
        info.set("register_this_station", register.to_joined());
    }

    if let Some(units) = config
        .root
        .lookup(&["StdReport", "Defaults"])
        .and_then(|s| s.value("unit_system"))
    {
        info.set("units", units.to_joined());
    }

    info
}

/// Work out the station attributes for an install or reconfigure.
///
/// Values in `config` come first, a command-line override replaces them,
/// and defaults fill whatever is still missing. With a `prompter` the user
/// then confirms or changes each value, picks a driver, and answers that
/// driver's own questions. Without one the result depends only on `config`
/// and `overrides`.
///
/// # Errors
///
/// Returns an error if prompting fails or is cancelled.
pub fn resolve(
    config: &ConfigObj,
    overrides: &StationOverrides,
    prompter: Option<&dyn Prompter>,
) -> Result<StationInfo> {
    let mut info = get_station_info(config);

    for key in STATION_KEYS {
        if let Some(value) = overrides.get(key) {
            info.set(key, value);
        } else if !info.contains(key)
            && let Some(value) = default_value(key)
        {
            info.set(key, value);
        }
    }

    if let Some(prompter) = prompter {
        let answers = prompter.prompt_for_info(&info)?;
        info.update(answers);

        let current = info.text("driver").unwrap_or_else(|| DEFAULT_DRIVER.into());
        let driver = prompter.prompt_for_driver(&current)?;
        info.set("driver", driver.as_str());

        for (key, value) in prompter.prompt_for_driver_settings(&driver, config)? {
            info.set(&key, value);
        }
    }

    Ok(info)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::prompt::MockPrompter;
    use super::*;

    const CONFIG: &str = "\
[Station]
    location = Boston, MA
    latitude = 42.36
    altitude = 20, foot
    station_type = Vantage

[Vantage]
    driver = weewx.drivers.vantage
    port = /dev/ttyS0

[StdRESTful]
    [[StationRegistry]]
        register_this_station = true

[StdReport]
    [[Defaults]]
        unit_system = us
";

    fn config() -> ConfigObj {
        ConfigObj::parse(CONFIG).expect("test data should parse")
    }

    #[test]
    fn get_station_info_reads_existing_values() {
        let info = get_station_info(&config());
        assert_eq!(info.text("location").as_deref(), Some("Boston, MA"));
        assert_eq!(info.text("latitude").as_deref(), Some("42.36"));
        assert_eq!(info.get("altitude"), Some(&Value::from(vec!["20", "foot"])));
        assert_eq!(info.text("station_type").as_deref(), Some("Vantage"));
        assert_eq!(info.text("driver").as_deref(), Some("weewx.drivers.vantage"));
        assert_eq!(info.text("register_this_station").as_deref(), Some("true"));
        assert_eq!(info.text("units").as_deref(), Some("us"));
        assert!(!info.contains("longitude"));
    }

    #[test]
    fn get_station_info_of_empty_config_is_empty() {
        let info = get_station_info(&ConfigObj::default());
        assert_eq!(info.iter().count(), 0);
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let info = resolve(&ConfigObj::default(), &StationOverrides::default(), None).unwrap();
        for key in STATION_KEYS {
            assert_eq!(info.get(key), default_value(key).as_ref(), "{key}");
        }
    }

    #[test]
    fn config_values_beat_defaults() {
        let info = resolve(&config(), &StationOverrides::default(), None).unwrap();
        assert_eq!(info.text("location").as_deref(), Some("Boston, MA"));
        assert_eq!(info.text("longitude").as_deref(), Some("0.0"));
        assert_eq!(info.text("units").as_deref(), Some("us"));
    }

    #[test]
    fn overrides_beat_config_values() {
        let overrides = StationOverrides {
            location: Some("Cambridge".into()),
            altitude: Some(vec!["12".into(), "meter".into()]),
            units: Some("metric".into()),
            ..StationOverrides::default()
        };
        let info = resolve(&config(), &overrides, None).unwrap();
        assert_eq!(info.text("location").as_deref(), Some("Cambridge"));
        assert_eq!(info.get("altitude"), Some(&Value::from(vec!["12", "meter"])));
        assert_eq!(info.text("units").as_deref(), Some("metric"));
        assert_eq!(info.text("latitude").as_deref(), Some("42.36"));
    }

    #[test]
    fn resolve_without_prompter_is_deterministic() {
        let overrides = StationOverrides {
            driver: Some("weewx.drivers.acurite".into()),
            ..StationOverrides::default()
        };
        let first = resolve(&config(), &overrides, None).unwrap();
        let second = resolve(&config(), &overrides, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prompt_answers_and_driver_settings_are_applied_last() {
        let mut prompter = MockPrompter::new();
        prompter.expect_prompt_for_info().times(1).returning(|current| {
            assert_eq!(current.text("location").as_deref(), Some("Boston, MA"));
            let mut answers = StationInfo::new();
            answers.set("location", "Somerville");
            Ok(answers)
        });
        prompter
            .expect_prompt_for_driver()
            .withf(|current| current == "weewx.drivers.vantage")
            .times(1)
            .returning(|_| Ok("weewx.drivers.fousb".to_string()));
        prompter
            .expect_prompt_for_driver_settings()
            .withf(|driver, _| driver == "weewx.drivers.fousb")
            .times(1)
            .returning(|_, _| Ok(vec![("model".to_string(), "WH3080".to_string())]));

        let info = resolve(&config(), &StationOverrides::default(), Some(&prompter)).unwrap();
        assert_eq!(info.text("location").as_deref(), Some("Somerville"));
        assert_eq!(info.text("driver").as_deref(), Some("weewx.drivers.fousb"));
        assert_eq!(info.text("model").as_deref(), Some("WH3080"));
        assert_eq!(
            info.driver_settings().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["model"]
        );
    }

    #[test]
    fn prompt_failure_is_propagated() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_prompt_for_info()
            .returning(|_| Err(anyhow::anyhow!("no terminal")));
        let err = resolve(&config(), &StationOverrides::default(), Some(&prompter)).unwrap_err();
        assert!(err.to_string().contains("no terminal"));
    }

    #[test]
    fn parse_altitude_accepts_known_units() {
        assert_eq!(
            parse_altitude("700,foot"),
            Some(vec!["700".to_string(), "foot".to_string()])
        );
        assert_eq!(
            parse_altitude(" -3.5 , meter "),
            Some(vec!["-3.5".to_string(), "meter".to_string()])
        );
        assert_eq!(parse_altitude("700,feet"), None);
        assert_eq!(parse_altitude("high,foot"), None);
        assert_eq!(parse_altitude(""), None);
    }
}
