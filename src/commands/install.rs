//! Install command implementation.
use std::path::Path;

use super::{ConfigEngine, Outcome};
use crate::error::EngineError;
use crate::options::Options;

/// Create a new configuration file from the distribution template.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded, prompting fails, or
/// the output cannot be written.
pub fn run(
    engine: &ConfigEngine<'_>,
    options: &Options,
    dist_config: &Path,
    output: &Path,
) -> Result<Outcome, EngineError> {
    let mut config = engine.load_template(dist_config)?;
    engine.apply_station(&mut config, options)?;
    let backup = engine.save(&config, output, options)?;
    Ok(Outcome::Installed {
        path: output.to_path_buf(),
        backup,
    })
}
