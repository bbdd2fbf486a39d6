//! Report skins configured under `[StdReport]` and the enable/disable
//! state machine.
use std::fmt;
use std::fmt::Write as _;

use anyhow::{Result, anyhow};

use crate::config::{ConfigObj, Value};
use crate::error::EngineError;

/// Section holding one subsection per report.
pub const REPORT_SECTION: &str = "StdReport";

/// Subsection of [`REPORT_SECTION`] holding settings shared by all reports;
/// it is not a skin.
pub const DEFAULTS_SECTION: &str = "Defaults";

/// Whether a skin is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinEnableStatus {
    /// `enable` is true.
    Enabled,
    /// `enable` is false.
    Disabled,
    /// The skin exists but `enable` is missing or not a boolean.
    Undefined,
    /// No report of that name is configured.
    InvalidSkinName,
}

impl fmt::Display for SkinEnableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Undefined => "undefined",
            Self::InvalidSkinName => "invalid skin name",
        })
    }
}

/// Requested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinAction {
    /// Set `enable = true`.
    Enable,
    /// Set `enable = false`.
    Disable,
}

impl SkinAction {
    /// Verb used when reporting the request.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

/// Outcome of applying a [`SkinAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinTransition {
    /// Nothing to do; the skin was already enabled.
    AlreadyEnabled,
    /// Nothing to do; the skin was already disabled.
    AlreadyDisabled,
    /// The skin was enabled, coming from `from`.
    Enabled {
        /// Status before the change.
        from: SkinEnableStatus,
    },
    /// The skin was disabled, coming from `from`.
    Disabled {
        /// Status before the change.
        from: SkinEnableStatus,
    },
}

impl SkinTransition {
    /// Whether the configuration was changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Enabled { .. } | Self::Disabled { .. })
    }

    /// Message reported to the user for `skin`.
    #[must_use]
    pub fn describe(self, skin: &str) -> String {
        match self {
            Self::AlreadyEnabled => format!("skin '{skin}' is already enabled"),
            Self::AlreadyDisabled => format!("skin '{skin}' is already disabled"),
            Self::Enabled {
                from: SkinEnableStatus::Undefined,
            } => format!("skin '{skin}' enable status is undefined - enabling"),
            Self::Enabled { .. } => format!("skin '{skin}' is disabled - enabling"),
            Self::Disabled {
                from: SkinEnableStatus::Undefined,
            } => format!("skin '{skin}' enable status is undefined - disabling"),
            Self::Disabled { .. } => format!("skin '{skin}' is enabled - disabling"),
        }
    }
}

/// Something whose skins can be switched on and off.
#[cfg_attr(test, mockall::automock)]
pub trait SkinMutator {
    /// Set the `enable` flag of `skin`.
    ///
    /// # Errors
    ///
    /// Returns an error if `skin` does not exist.
    fn set_enabled(&mut self, skin: &str, enabled: bool) -> Result<()>;
}

impl SkinMutator for ConfigObj {
    fn set_enabled(&mut self, skin: &str, enabled: bool) -> Result<()> {
        let section = self
            .root
            .section_mut(REPORT_SECTION)
            .and_then(|reports| reports.section_mut(skin))
            .ok_or_else(|| anyhow!("skin '{skin}' is not configured"))?;
        section.set("enable", if enabled { "true" } else { "false" });
        Ok(())
    }
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value.as_scalar()?.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Status of `skin` in `config`.
#[must_use]
pub fn get_enable_status(config: &ConfigObj, skin: &str) -> SkinEnableStatus {
    if skin == DEFAULTS_SECTION {
        return SkinEnableStatus::InvalidSkinName;
    }
    let Some(section) = config.root.lookup(&[REPORT_SECTION, skin]) else {
        return SkinEnableStatus::InvalidSkinName;
    };
    match section.value("enable").and_then(parse_bool) {
        Some(true) => SkinEnableStatus::Enabled,
        Some(false) => SkinEnableStatus::Disabled,
        None => SkinEnableStatus::Undefined,
    }
}

/// Configured skins in file order, with their status.
#[must_use]
pub fn list_skins(config: &ConfigObj) -> Vec<(String, SkinEnableStatus)> {
    config
        .root
        .section(REPORT_SECTION)
        .map(|reports| {
            reports
                .section_names()
                .filter(|name| *name != DEFAULTS_SECTION)
                .map(|name| (name.to_string(), get_enable_status(config, name)))
                .collect()
        })
        .unwrap_or_default()
}

/// Render [`list_skins`] output, one skin per line.
#[must_use]
pub fn render_skin_list(skins: &[(String, SkinEnableStatus)]) -> String {
    let width = skins.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, status) in skins {
        writeln!(out, "{name:<width$}  {status}").ok();
    }
    out
}

/// Apply `action` to `skin`, currently in `status`.
///
/// The mutator is called at most once, and only when the status changes.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSkinName`] when the skin is not configured,
/// or the mutator's error.
pub fn toggle(
    status: SkinEnableStatus,
    action: SkinAction,
    skin: &str,
    mutator: &mut dyn SkinMutator,
) -> Result<SkinTransition, EngineError> {
    let transition = match (status, action) {
        (SkinEnableStatus::InvalidSkinName, _) => {
            return Err(EngineError::InvalidSkinName(skin.to_string()));
        }
        (SkinEnableStatus::Enabled, SkinAction::Enable) => SkinTransition::AlreadyEnabled,
        (SkinEnableStatus::Disabled, SkinAction::Disable) => SkinTransition::AlreadyDisabled,
        (from, SkinAction::Enable) => SkinTransition::Enabled { from },
        (from, SkinAction::Disable) => SkinTransition::Disabled { from },
    };
    if transition.changed() {
        mutator.set_enabled(skin, action == SkinAction::Enable)?;
    }
    Ok(transition)
}
