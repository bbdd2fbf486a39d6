//! Turn a parsed command line into exactly one validated operation.
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Value;
use crate::error::UsageError;
use crate::skins::SkinAction;
use crate::station;

/// The single operation a run performs, with the parameters it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Print the driver catalog.
    ListDrivers,
    /// Create a new configuration file from the distribution template.
    Install {
        /// Distribution template.
        dist_config: PathBuf,
        /// Where the new file is written.
        output: PathBuf,
    },
    /// Merge an existing configuration file into a newer template.
    Upgrade {
        /// Distribution template.
        dist_config: PathBuf,
        /// File being upgraded.
        config: PathBuf,
        /// Destination, if not `config` itself.
        output: Option<PathBuf>,
    },
    /// Change station settings in an existing file.
    Reconfigure {
        /// File to reconfigure; searched for when absent.
        config: Option<PathBuf>,
        /// Destination, if not the file that was read.
        output: Option<PathBuf>,
    },
    /// Print the configured skins.
    ListSkins {
        /// File to read; searched for when absent.
        config: Option<PathBuf>,
    },
    /// Enable or disable one skin.
    ToggleSkin {
        /// Report section name under `[StdReport]`.
        skin: String,
        /// What to do with it.
        action: SkinAction,
        /// File to modify; searched for when absent.
        config: Option<PathBuf>,
    },
}

/// Station values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationOverrides {
    /// `--location`.
    pub location: Option<String>,
    /// `--latitude`, in decimal degrees.
    pub latitude: Option<String>,
    /// `--longitude`, in decimal degrees.
    pub longitude: Option<String>,
    /// `--altitude`, always `[value, unit]`.
    pub altitude: Option<Vec<String>>,
    /// `--units`.
    pub units: Option<String>,
    /// `--driver` module name.
    pub driver: Option<String>,
    /// `--register-this-station`, `true` or `false`.
    pub register_this_station: Option<String>,
}

impl StationOverrides {
    /// The override for a station key, if one was given.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let scalar = |v: &Option<String>| v.clone().map(Value::Scalar);
        match key {
            "location" => scalar(&self.location),
            "latitude" => scalar(&self.latitude),
            "longitude" => scalar(&self.longitude),
            "altitude" => self.altitude.clone().map(Value::List),
            "units" => scalar(&self.units),
            "driver" => scalar(&self.driver),
            "register_this_station" => scalar(&self.register_this_station),
            _ => None,
        }
    }

    fn from_cli(cli: &Cli) -> Result<Self, UsageError> {
        let altitude = cli
            .altitude
            .as_deref()
            .map(|raw| {
                station::parse_altitude(raw).ok_or_else(|| UsageError::InvalidAltitude(raw.into()))
            })
            .transpose()?;
        Ok(Self {
            location: cli.location.clone(),
            latitude: cli.latitude.clone(),
            longitude: cli.longitude.clone(),
            altitude,
            units: cli.units.clone(),
            driver: cli.driver.clone(),
            register_this_station: cli.register_this_station.clone(),
        })
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// What to do.
    pub operation: Operation,
    /// Replace files without keeping a timestamped copy.
    pub no_backup: bool,
    /// Never prompt; resolve station values from the command line,
    /// the existing file, and defaults.
    pub no_prompt: bool,
    /// Log each value written into the configuration.
    pub debug: bool,
    /// Station values from the command line.
    pub overrides: StationOverrides,
}

impl Options {
    /// Validate `cli`.
    ///
    /// Rules are applied in order and the first one violated is returned:
    ///
    /// 0. `--list-drivers` wins over everything else.
    /// 1. At most one of `--list-skins`, `--enable-skin`, `--disable-skin`.
    /// 2. Without a skin operation, exactly one of `--install`,
    ///    `--upgrade`, `--reconfigure`.
    /// 3. `--install` and `--upgrade` need `--dist-config`.
    /// 4. `--upgrade` needs an existing configuration file.
    /// 5. `--install` needs `--output`.
    /// 6. `--install` must not be given an existing configuration file.
    /// 7. A skin operation cannot be combined with the other operations.
    ///
    /// `--altitude` is then normalised to `[value, unit]`.
    ///
    /// # Errors
    ///
    /// Returns the [`UsageError`] for the first rule violated.
    pub fn from_cli(cli: &Cli) -> Result<Self, UsageError> {
        let config = cli.config_path.clone().or_else(|| cli.config_arg.clone());

        if cli.list_drivers {
            return Ok(Self::with_operation(cli, Operation::ListDrivers, StationOverrides::default()));
        }

        let skin_ops = count_set(&[
            cli.list_skins,
            cli.enable_skin.is_some(),
            cli.disable_skin.is_some(),
        ]);
        let config_ops = count_set(&[cli.install, cli.upgrade, cli.reconfigure]);

        if skin_ops > 1 {
            return Err(UsageError::ConflictingSkinOperations);
        }
        if skin_ops == 0 && config_ops != 1 {
            return Err(UsageError::ConflictingOperations);
        }

        let dist_config = cli
            .dist_config
            .clone()
            .filter(|p| !p.as_os_str().is_empty());
        if (cli.install || cli.upgrade) && dist_config.is_none() {
            return Err(UsageError::MissingDistConfig);
        }
        if cli.upgrade && config.is_none() {
            return Err(UsageError::MissingConfigForUpgrade);
        }
        if cli.install && cli.output.is_none() {
            return Err(UsageError::MissingOutput);
        }
        if cli.install && config.is_some() {
            return Err(UsageError::ConfigWithInstall);
        }
        if skin_ops == 1 && config_ops > 0 {
            return Err(UsageError::SkinWithConfigOperation);
        }

        let overrides = StationOverrides::from_cli(cli)?;

        let operation = if cli.list_skins {
            Operation::ListSkins { config }
        } else if let Some(skin) = &cli.enable_skin {
            Operation::ToggleSkin {
                skin: skin.clone(),
                action: SkinAction::Enable,
                config,
            }
        } else if let Some(skin) = &cli.disable_skin {
            Operation::ToggleSkin {
                skin: skin.clone(),
                action: SkinAction::Disable,
                config,
            }
        } else if cli.install {
            Operation::Install {
                dist_config: dist_config.ok_or(UsageError::MissingDistConfig)?,
                output: cli.output.clone().ok_or(UsageError::MissingOutput)?,
            }
        } else if cli.upgrade {
            Operation::Upgrade {
                dist_config: dist_config.ok_or(UsageError::MissingDistConfig)?,
                config: config.ok_or(UsageError::MissingConfigForUpgrade)?,
                output: cli.output.clone(),
            }
        } else {
            Operation::Reconfigure {
                config,
                output: cli.output.clone(),
            }
        };

        Ok(Self::with_operation(cli, operation, overrides))
    }

    const fn with_operation(cli: &Cli, operation: Operation, overrides: StationOverrides) -> Self {
        Self {
            operation,
            no_backup: cli.no_backup,
            no_prompt: cli.no_prompt,
            debug: cli.debug,
            overrides,
        }
    }
}

fn count_set(flags: &[bool]) -> usize {
    flags.iter().filter(|set| **set).count()
}
