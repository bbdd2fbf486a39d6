//! Reconfigure command implementation.
use std::path::Path;

use super::{ConfigEngine, Outcome};
use crate::error::EngineError;
use crate::options::Options;

/// Change the station settings of an existing configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be found or loaded, prompting
/// fails, or the result cannot be written.
pub fn run(
    engine: &ConfigEngine<'_>,
    options: &Options,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<Outcome, EngineError> {
    let (path, mut working) = engine.load_existing(config)?;
    engine.apply_station(&mut working, options)?;
    let target = output.map_or(path, Path::to_path_buf);
    let backup = engine.save(&working, &target, options)?;
    Ok(Outcome::Reconfigured {
        path: target,
        backup,
    })
}
