//! Upgrade command implementation.
use std::path::Path;

use super::{ConfigEngine, Outcome};
use crate::config::update_and_merge;
use crate::error::EngineError;
use crate::options::Options;

/// Merge an existing configuration file into a newer template.
///
/// The result goes to `output` if given, otherwise back over `config`.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded or the result cannot
/// be written.
pub fn run(
    engine: &ConfigEngine<'_>,
    options: &Options,
    dist_config: &Path,
    config: &Path,
    output: Option<&Path>,
) -> Result<Outcome, EngineError> {
    let template = engine.load_template(dist_config)?;
    let (path, mut working) = engine.load_existing(Some(config))?;

    engine.log.stage("Merging configuration");
    let old_version = working.root.scalar("version").map(str::to_string);
    update_and_merge(&mut working, &template);
    match (old_version, working.root.scalar("version")) {
        (Some(old), Some(new)) if old != new => {
            engine.log.info(&format!("upgraded from version {old} to {new}"));
        }
        (_, Some(new)) => engine.log.info(&format!("merged into version {new}")),
        _ => engine.log.info("merged into distribution template"),
    }

    let target = output.map_or(path, Path::to_path_buf);
    let backup = engine.save(&working, &target, options)?;
    Ok(Outcome::Upgraded {
        path: target,
        backup,
    })
}
