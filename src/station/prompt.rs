//! Interactive questions about the station.
use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use inquire::validator::Validation;
use inquire::{Confirm, Select, Text};

use super::{ALTITUDE_UNITS, StationInfo, UNIT_SYSTEMS, parse_altitude};
use crate::config::{ConfigObj, Value};
use crate::drivers::DriverCatalog;

/// Source of answers about the station.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask for the station values, offering `current` as defaults. Returns
    /// only the values to change.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers cannot be read.
    fn prompt_for_info(&self, current: &StationInfo) -> Result<StationInfo>;

    /// Ask which driver to use, starting from `current`.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn prompt_for_driver(&self, current: &str) -> Result<String>;

    /// Ask for the settings of `driver`, offering the values already in
    /// `config` as defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers cannot be read.
    fn prompt_for_driver_settings(
        &self,
        driver: &str,
        config: &ConfigObj,
    ) -> Result<Vec<(String, String)>>;
}

/// Asks on the terminal.
#[derive(Debug)]
pub struct InquirePrompter<'a> {
    catalog: &'a DriverCatalog,
}

impl<'a> InquirePrompter<'a> {
    /// Prompter offering the drivers in `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a DriverCatalog) -> Self {
        Self { catalog }
    }
}

fn ensure_terminal() -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("standard input is not a terminal; rerun with --no-prompt to use defaults");
    }
    Ok(())
}

fn degrees_validator(
    limit: f64,
) -> impl Fn(&str) -> Result<Validation, inquire::CustomUserError> + Clone {
    move |input: &str| match input.trim().parse::<f64>() {
        Ok(v) if (-limit..=limit).contains(&v) => Ok(Validation::Valid),
        _ => Ok(Validation::Invalid(
            format!("enter a number between -{limit} and {limit}").into(),
        )),
    }
}

fn is_true(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

impl Prompter for InquirePrompter<'_> {
    fn prompt_for_info(&self, current: &StationInfo) -> Result<StationInfo> {
        ensure_terminal()?;
        let text = |key: &str| current.text(key).unwrap_or_default();
        let mut answers = StationInfo::new();

        let location = Text::new("Description of the station, such as its location:")
            .with_default(&text("location"))
            .prompt()
            .context("failed to read station location")?;
        answers.set("location", location.trim());

        let latitude = Text::new("Latitude in decimal degrees, negative for southern hemisphere:")
            .with_default(&text("latitude"))
            .with_validator(degrees_validator(90.0))
            .prompt()
            .context("failed to read station latitude")?;
        answers.set("latitude", latitude.trim());

        let longitude = Text::new("Longitude in decimal degrees, negative for western hemisphere:")
            .with_default(&text("longitude"))
            .with_validator(degrees_validator(180.0))
            .prompt()
            .context("failed to read station longitude")?;
        answers.set("longitude", longitude.trim());

        let altitude = Text::new("Altitude of the station with unit (foot or meter):")
            .with_default(&text("altitude"))
            .with_help_message("for example: 700, foot")
            .with_validator(|input: &str| {
                Ok(if parse_altitude(input).is_some() {
                    Validation::Valid
                } else {
                    Validation::Invalid(
                        format!("expected VALUE, UNIT with UNIT one of {ALTITUDE_UNITS:?}").into(),
                    )
                })
            })
            .prompt()
            .context("failed to read station altitude")?;
        if let Some(altitude) = parse_altitude(&altitude) {
            answers.set("altitude", altitude);
        }

        let register = Confirm::new("Register this station with weewx.com?")
            .with_default(is_true(&text("register_this_station")))
            .prompt()
            .context("failed to read station registration choice")?;
        answers.set("register_this_station", if register { "true" } else { "false" });

        let current_units = text("units");
        let start = UNIT_SYSTEMS
            .iter()
            .position(|u| *u == current_units)
            .unwrap_or(1);
        let units = Select::new("Unit system for reports:", UNIT_SYSTEMS.to_vec())
            .with_starting_cursor(start)
            .prompt()
            .context("failed to read unit system")?;
        answers.set("units", units);

        Ok(answers)
    }

    fn prompt_for_driver(&self, current: &str) -> Result<String> {
        ensure_terminal()?;
        let drivers = self.catalog.drivers();
        if drivers.is_empty() {
            return Ok(current.to_string());
        }
        let labels: Vec<String> = drivers
            .iter()
            .map(|d| format!("{} ({})", d.module, d.description))
            .collect();
        let start = drivers
            .iter()
            .position(|d| d.module == current)
            .unwrap_or(0);
        let choice = Select::new("Station driver:", labels)
            .with_starting_cursor(start)
            .raw_prompt()
            .context("failed to read driver choice")?;
        Ok(drivers
            .get(choice.index)
            .map_or_else(|| current.to_string(), |d| d.module.clone()))
    }

    fn prompt_for_driver_settings(
        &self,
        driver: &str,
        config: &ConfigObj,
    ) -> Result<Vec<(String, String)>> {
        let Some(info) = self.catalog.find(driver) else {
            return Ok(Vec::new());
        };
        if info.settings.is_empty() {
            return Ok(Vec::new());
        }
        ensure_terminal()?;

        let existing = config.root.section(&info.station_type);
        let mut answers = Vec::with_capacity(info.settings.len());
        for setting in &info.settings {
            let default = existing
                .and_then(|s| s.value(&setting.name))
                .map_or_else(|| setting.default.clone(), Value::to_joined);
            let answer = Text::new(&format!("{}:", setting.prompt))
                .with_default(&default)
                .prompt()
                .with_context(|| {
                    format!(
                        "failed to read {} setting '{}'",
                        info.station_type, setting.name
                    )
                })?;
            answers.push((setting.name.clone(), answer.trim().to_string()));
        }
        Ok(answers)
    }
}
