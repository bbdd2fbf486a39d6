//! Skin listing and the enable/disable commands.
use std::io::Write;
use std::path::Path;

use super::{ConfigEngine, Outcome, emit};
use crate::error::EngineError;
use crate::options::Options;
use crate::skins::{self as skin_state, SkinAction};

/// Print the configured skins and their status.
///
/// # Errors
///
/// Returns an error if the file cannot be found or loaded, or `out` cannot
/// be written.
pub fn list(
    engine: &ConfigEngine<'_>,
    config: Option<&Path>,
    out: &mut dyn Write,
) -> Result<Outcome, EngineError> {
    let (_, working) = engine.load_existing(config)?;
    let skins = skin_state::list_skins(&working);
    if skins.is_empty() {
        engine.log.warn("no skins are configured");
    }
    emit(out, &skin_state::render_skin_list(&skins))?;
    Ok(Outcome::SkinsListed)
}

/// Enable or disable one skin and save the file if it changed.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSkinName`] if `skin` is not configured,
/// after printing the same message to `out`, or an error if the file cannot
/// be loaded or written.
pub fn toggle(
    engine: &ConfigEngine<'_>,
    options: &Options,
    skin: &str,
    action: SkinAction,
    config: Option<&Path>,
    out: &mut dyn Write,
) -> Result<Outcome, EngineError> {
    let (path, mut working) = engine.load_existing(config)?;
    engine.log.stage(&format!("Attempting to {} skin '{skin}'", action.verb()));

    let status = skin_state::get_enable_status(&working, skin);
    engine.log.debug(&format!("skin '{skin}' is {status}"));
    let transition = match skin_state::toggle(status, action, skin, &mut working) {
        Ok(transition) => transition,
        Err(err @ EngineError::InvalidSkinName(_)) => {
            emit(out, &format!("{err}\n"))?;
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    emit(out, &format!("{}\n", transition.describe(skin)))?;

    let backup = if transition.changed() {
        engine.save(&working, &path, options)?
    } else {
        None
    };
    Ok(Outcome::SkinToggled {
        skin: skin.to_string(),
        transition,
        backup,
    })
}
