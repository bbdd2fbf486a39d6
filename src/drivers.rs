//! Catalog of station drivers.
//!
//! The catalog is a TOML document compiled into the binary. It tells the
//! engine which config section (station type) belongs to a driver module,
//! which settings that section carries, and what their defaults are.
use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Deserialize;

const BUILTIN: &str = include_str!("drivers.toml");

/// One driver-specific setting offered when prompting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverSetting {
    /// Key written into the driver's section.
    pub name: String,
    /// Value used when the section does not already have one.
    pub default: String,
    /// Question shown to the user.
    pub prompt: String,
}

/// A station driver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverInfo {
    /// Module the station process loads, e.g. `weewx.drivers.vantage`.
    pub module: String,
    /// Name of the config section holding the driver's settings.
    pub station_type: String,
    /// One-line description for listings and prompts.
    pub description: String,
    /// Settings offered when prompting, in prompt order.
    #[serde(default)]
    pub settings: Vec<DriverSetting>,
}

/// All known drivers, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverCatalog {
    #[serde(rename = "driver", default)]
    drivers: Vec<DriverInfo>,
}

impl DriverCatalog {
    /// Load the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document does not deserialize.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN).context("loading built-in driver catalog")
    }

    /// Parse a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a valid catalog.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing driver catalog")
    }

    /// All drivers, in listing order.
    #[must_use]
    pub fn drivers(&self) -> &[DriverInfo] {
        &self.drivers
    }

    /// Find a driver by module name.
    #[must_use]
    pub fn find(&self, module: &str) -> Option<&DriverInfo> {
        self.drivers.iter().find(|d| d.module == module)
    }
}

/// Render the catalog as an aligned table, one driver per line.
#[must_use]
pub fn render_list(catalog: &DriverCatalog) -> String {
    let module_width = catalog
        .drivers()
        .iter()
        .map(|d| d.module.len())
        .max()
        .unwrap_or(0);
    let type_width = catalog
        .drivers()
        .iter()
        .map(|d| d.station_type.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for driver in catalog.drivers() {
        writeln!(
            out,
            "{:<module_width$}  {:<type_width$}  {}",
            driver.module, driver.station_type, driver.description
        )
        .ok();
    }
    out
}
