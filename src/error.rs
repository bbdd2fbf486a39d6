//! Domain-specific error types for the configuration engine.
//!
//! Internal modules return typed errors built with [`thiserror`]. Helpers
//! that only need contextual messages (prompting, the driver catalog, the
//! output sink) use [`anyhow`] and are folded into [`EngineError::Other`].
//! Only `main` turns an error into a process exit code.
//!
//! # Error hierarchy
//!
//! ```text
//! EngineError
//! ├── Usage(UsageError)       conflicting or missing command-line flags
//! ├── Config(ConfigError)     config file I/O, syntax, search failures
//! ├── InvalidSkinName         skin not present under [StdReport]
//! ├── Logic                   internal invariant violation
//! └── Other(anyhow::Error)    prompt, catalog, or output failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a successful run or an informational early exit.
pub const EXIT_OK: u8 = 0;
/// Exit status for an invalid skin name or any runtime failure.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for a usage error detected before any file is touched.
pub const EXIT_USAGE: u8 = 2;

/// Top-level error type for one engine run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The command line asked for an impossible or incomplete operation.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A configuration file could not be located, read, parsed, or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested skin is not configured.
    #[error("invalid skin name '{0}' - run '--list-skins' for a list")]
    InvalidSkinName(String),

    /// The engine reached a state that validation should have ruled out.
    #[error("internal logic error: {0}")]
    Logic(String),

    /// Any other failure, carrying its own context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::Config(_) | Self::InvalidSkinName(_) | Self::Logic(_) | Self::Other(_) => {
                EXIT_FAILURE
            }
        }
    }
}

/// Invalid, missing, or conflicting command-line flags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// More than one of the skin operations was requested.
    #[error("Must specify one and only one of --list-skins, --enable-skin, or --disable-skin.")]
    ConflictingSkinOperations,

    /// Zero or several of install/upgrade/reconfigure were requested.
    #[error("Must specify one and only one of --install, --upgrade, or --reconfigure.")]
    ConflictingOperations,

    /// A skin operation was combined with install/upgrade/reconfigure.
    #[error("A skin operation cannot be combined with --install, --upgrade, or --reconfigure.")]
    SkinWithConfigOperation,

    /// Install or upgrade was requested without a distribution template.
    #[error("The commands --install and --upgrade require option --dist-config.")]
    MissingDistConfig,

    /// Upgrade was requested without naming the file to upgrade.
    #[error("The command --upgrade requires an existing configuration file.")]
    MissingConfigForUpgrade,

    /// Install was requested without an output path.
    #[error("The --install command requires option --output.")]
    MissingOutput,

    /// Install was given an existing configuration file.
    #[error("A configuration file cannot be used with the --install command.")]
    ConfigWithInstall,

    /// `--altitude` was not of the form `VALUE,UNIT`.
    #[error("Invalid altitude '{0}': expected VALUE,UNIT where UNIT is 'foot' or 'meter'.")]
    InvalidAltitude(String),
}

/// Errors that arise while locating, reading, parsing, or writing a
/// configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be opened, read, or written.
    #[error("Unable to access configuration file {path}: {source}")]
    Io {
        /// Path to the file involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file content is not valid configuration syntax.
    #[error("Syntax error in configuration file '{path}': {message}")]
    Syntax {
        /// Path to the malformed file.
        path: PathBuf,
        /// Parser diagnostic, including the line number.
        message: String,
    },

    /// No configuration file was named and none was found in the search path.
    #[error("Unable to find a configuration file named {file_name} in: {}", display_paths(.searched))]
    NotFound {
        /// File name that was searched for.
        file_name: String,
        /// Directories that were searched, in order.
        searched: Vec<PathBuf>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
