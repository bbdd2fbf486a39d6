//! The configuration engine and the command behind each operation.
pub mod drivers;
pub mod install;
pub mod reconfigure;
pub mod skins;
pub mod upgrade;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::{self, ConfigObj};
use crate::drivers::DriverCatalog;
use crate::error::EngineError;
use crate::logging::Log;
use crate::options::{Operation, Options};
use crate::skins::SkinTransition;
use crate::station::{self, Prompter, STATION_KEYS};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The driver catalog was printed.
    DriversListed,
    /// A new configuration file was written.
    Installed {
        /// File written.
        path: PathBuf,
        /// Copy of the file it replaced, if any.
        backup: Option<PathBuf>,
    },
    /// An existing file was merged into a newer template.
    Upgraded {
        /// File written.
        path: PathBuf,
        /// Copy of the file it replaced, if any.
        backup: Option<PathBuf>,
    },
    /// Station settings were changed.
    Reconfigured {
        /// File written.
        path: PathBuf,
        /// Copy of the file it replaced, if any.
        backup: Option<PathBuf>,
    },
    /// The configured skins were printed.
    SkinsListed,
    /// A skin was enabled or disabled, or already was.
    SkinToggled {
        /// Skin name.
        skin: String,
        /// What happened.
        transition: SkinTransition,
        /// Copy of the file before the change, if the file was rewritten
        /// with backups on.
        backup: Option<PathBuf>,
    },
}

/// Runs one validated operation against the configuration files.
///
/// Borrowed collaborators let tests substitute the logger and prompter.
pub struct ConfigEngine<'a> {
    log: &'a dyn Log,
    prompter: &'a dyn Prompter,
    catalog: &'a DriverCatalog,
}

impl std::fmt::Debug for ConfigEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigEngine")
            .field("catalog", &self.catalog.drivers().len())
            .finish_non_exhaustive()
    }
}

impl<'a> ConfigEngine<'a> {
    /// Create an engine.
    #[must_use]
    pub const fn new(
        log: &'a dyn Log,
        prompter: &'a dyn Prompter,
        catalog: &'a DriverCatalog,
    ) -> Self {
        Self {
            log,
            prompter,
            catalog,
        }
    }

    /// Run `options`, writing listings and skin messages to `out`.
    ///
    /// A configuration file is written at most once, after every change
    /// has been applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be found, read, parsed or written,
    /// if prompting fails, or if a skin name is not configured.
    pub fn run(&self, options: &Options, out: &mut dyn Write) -> Result<Outcome, EngineError> {
        match &options.operation {
            Operation::ListDrivers => drivers::run(self, out),
            Operation::Install {
                dist_config,
                output,
            } => install::run(self, options, dist_config, output),
            Operation::Upgrade {
                dist_config,
                config,
                output,
            } => upgrade::run(self, options, dist_config, config, output.as_deref()),
            Operation::Reconfigure { config, output } => {
                reconfigure::run(self, options, config.as_deref(), output.as_deref())
            }
            Operation::ListSkins { config } => skins::list(self, config.as_deref(), out),
            Operation::ToggleSkin {
                skin,
                action,
                config,
            } => skins::toggle(self, options, skin, *action, config.as_deref(), out),
        }
    }

    /// Load the distribution template.
    fn load_template(&self, path: &Path) -> Result<ConfigObj, EngineError> {
        self.log.stage("Loading distribution template");
        let template = config::load(path)?;
        self.log
            .info(&format!("Using distribution file {}", path.display()));
        if let Some(version) = template.root.scalar("version") {
            self.log.debug(&format!("template version {version}"));
        }
        Ok(template)
    }

    /// Read an existing configuration file, searching for it if not named.
    fn load_existing(&self, explicit: Option<&Path>) -> Result<(PathBuf, ConfigObj), EngineError> {
        self.log.stage("Loading configuration");
        let (path, config) = config::read_config(explicit)?;
        self.log
            .info(&format!("Using configuration file {}", path.display()));
        Ok((path, config))
    }

    /// Resolve station information and fold it into `config`.
    fn apply_station(&self, config: &mut ConfigObj, options: &Options) -> Result<(), EngineError> {
        self.log.stage("Resolving station information");
        let prompter = (!options.no_prompt).then_some(self.prompter);
        let info = station::resolve(config, &options.overrides, prompter)?;

        if let Some(missing) = STATION_KEYS.iter().find(|key| !info.contains(key)) {
            return Err(EngineError::Logic(format!(
                "station value '{missing}' was not resolved"
            )));
        }
        for key in STATION_KEYS {
            if let Some(value) = info.text(key) {
                self.log.debug(&format!("{key}: {value}"));
            }
        }

        station::modify_config(config, &info, self.catalog, self.log, options.debug);
        Ok(())
    }

    /// Write `config` to `path`, keeping a backup unless disabled.
    fn save(
        &self,
        config: &ConfigObj,
        path: &Path,
        options: &Options,
    ) -> Result<Option<PathBuf>, EngineError> {
        self.log.stage("Saving configuration");
        let backup = config::save(config, path, !options.no_backup)?;
        if let Some(backup) = &backup {
            self.log
                .info(&format!("Saved backup to {}", backup.display()));
        }
        self.log
            .info(&format!("Saved configuration to {}", path.display()));
        Ok(backup)
    }
}

fn emit(out: &mut dyn Write, text: &str) -> Result<(), EngineError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write to standard output")?;
    Ok(())
}
